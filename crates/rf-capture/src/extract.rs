use rf_core::pattern::Pattern;
use rf_core::timing::{near_match, near_match_blob, near_match_pair};

/// Nombre de paires inspectées en aval d'une ancre pour valider le gap
/// inter-blobs.
pub const GAP_LOOKAHEAD_PAIRS: usize = 5;

/// Nombre minimal d'occurrences d'une longueur de blob pour qu'elle soit
/// retenue au vote.
pub const MIN_BLOB_APPEARANCES: usize = 2;

/// Cherche l'unité de répétition ("blob") dans un buffer de capture plein.
///
/// Fonction pure du contenu du buffer : aucun état partagé, le scratch des
/// frontières candidates est local à l'appel. Deux passes sur le même buffer
/// rendent le même résultat.
///
/// L'ancre recherchée est la paire qui PRÉCÈDE le plus long silence
/// inter-blobs, la plus facile à localiser. Le motif rendu est pivoté d'une
/// paire pour replacer cette paire de queue en fin de séquence.
///
/// Rend `None` quand aucune ancre ne produit de blob qualifié.
#[must_use]
pub fn extract(buffer: &[u32]) -> Option<Pattern> {
    let len = buffer.len();

    // Scan des ancres : on démarre à mi-buffer pour éviter un début d'envoi
    // tardif, et on s'arrête tant que la fenêtre de lookahead est disponible.
    let start = (len / 4) * 2;
    let stop = len.saturating_sub(GAP_LOOKAHEAD_PAIRS * 2);

    let mut anchor = start;
    while anchor + 1 < stop {
        if let Some(pattern) = try_anchor(buffer, anchor) {
            return Some(pattern);
        }
        anchor += 2;
    }

    None
}

/// Tente une extraction complète depuis une ancre donnée (offset élément pair).
fn try_anchor(buffer: &[u32], anchor: usize) -> Option<Pattern> {
    let anchor_off = buffer[anchor + 1];

    // Filtre de gap : l'OFF de l'ancre doit dominer strictement, hors
    // tolérance, les 4 OFF suivants.
    for i in 1..GAP_LOOKAHEAD_PAIRS {
        let off = buffer[anchor + i * 2 + 1];
        if off > anchor_off || near_match(anchor_off, off) {
            return None;
        }
    }

    // Frontières suspectes : toute paire du buffer similaire à l'ancre.
    let anchor_pair = (buffer[anchor], buffer[anchor + 1]);
    let mut starts: Vec<usize> = Vec::new();
    let mut candidate = 0;
    while candidate + 1 < buffer.len() {
        if near_match_pair(anchor_pair, (buffer[candidate], buffer[candidate + 1])) {
            starts.push(candidate);
        }
        candidate += 2;
    }

    // Vote de longueur : mode des distances entre frontières consécutives.
    let distances: Vec<usize> = starts.windows(2).map(|w| w[1] - w[0]).collect();
    let mut best_len = 0usize;
    let mut best_count = 0usize;
    for &distance in &distances {
        if distance == best_len {
            continue;
        }
        let count = distances.iter().filter(|&&d| d == distance).count();
        if count > best_count {
            best_count = count;
            best_len = distance;
        }
    }

    // Un blob doit apparaître au moins quelques fois ; sinon l'ancre suivante
    // tentera sa chance.
    if best_count < MIN_BLOB_APPEARANCES {
        return None;
    }

    // Vote de contenu : parmi les frontières à la bonne distance, celle dont
    // le blob ressemble au plus grand nombre d'autres blobs. Égalité : la
    // première rencontrée gagne.
    let mut best_start: Option<usize> = None;
    let mut best_score = 0usize;
    for i in 0..starts.len().saturating_sub(1) {
        if starts[i + 1] - starts[i] != best_len {
            continue;
        }
        let blob = &buffer[starts[i]..starts[i] + best_len];

        let mut score = 0usize;
        for j in 0..starts.len().saturating_sub(1) {
            if j == i {
                continue;
            }
            if near_match_blob(blob, &buffer[starts[j]..starts[j + 1]]) {
                score += 1;
            }
        }

        if best_start.is_none() || score > best_score {
            best_start = Some(starts[i]);
            best_score = score;
        }
    }

    let winner = best_start?;

    // Copie pivotée : la paire trouvée est en réalité la dernière du blob
    // (c'était la plus simple à localiser) : on la repousse en queue.
    let blob = &buffer[winner..winner + best_len];
    let rotated = (0..best_len).map(|i| blob[(i + 2) % best_len]).collect();

    Some(Pattern::new(rotated))
}
