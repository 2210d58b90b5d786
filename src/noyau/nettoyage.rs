// src/noyau/nettoyage.rs
//
// Normalisation du texte AVANT tokenisation.
// - minuscules
// - suppression des espaces
// - virgule décimale -> point
// - si activé: symboles Unicode -> formes ASCII (π, ℇ, φ, −, ×, ÷, √…)
//
// Jamais d'erreur ici: un caractère irrécupérable est laissé tel quel,
// le tokenizer le signalera avec sa position.

/// Normalise une expression. `symboles` active la substitution Unicode.
pub fn nettoie(texte: &str, symboles: bool) -> String {
    let mut s: String = texte
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if symboles {
        s = remplace_symboles(&s);
        s = remplace_racines(&s);
    }

    s
}

/// Substitutions un-pour-un (glyphes mathématiques usuels).
fn remplace_symboles(s: &str) -> String {
    let mut sortie = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'π' => sortie.push_str("pi"),
            'ℇ' => sortie.push('e'),
            'φ' => sortie.push_str("phi"),
            '−' => sortie.push('-'),
            '×' => sortie.push('*'),
            '÷' => sortie.push('/'),
            _ => sortie.push(c),
        }
    }
    sortie
}

/// Réécrit `√(...)` (jusqu'à la PREMIÈRE parenthèse fermante) et
/// `√` suivi d'un nombre signé nu en `sqrt(...)`.
/// Un `√` qui ne correspond à aucune des deux formes reste en place.
fn remplace_racines(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut sortie = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '√' {
            sortie.push(chars[i]);
            i += 1;
            continue;
        }

        // Forme parenthésée: √( ... ), contenu non vide, première ')'
        if i + 1 < chars.len() && chars[i + 1] == '(' {
            if let Some(fermante) = chars[i + 2..].iter().position(|&c| c == ')') {
                let fin = i + 2 + fermante;
                if fin > i + 2 {
                    sortie.push_str("sqrt(");
                    sortie.extend(&chars[i + 2..fin]);
                    sortie.push(')');
                    i = fin + 1;
                    continue;
                }
            }
        }

        // Forme nue: √ suivi d'un nombre signé (-?\d+(\.\d+)?)
        if let Some(fin) = fin_nombre_signe(&chars, i + 1) {
            sortie.push_str("sqrt(");
            sortie.extend(&chars[i + 1..fin]);
            sortie.push(')');
            i = fin;
            continue;
        }

        sortie.push('√');
        i += 1;
    }

    sortie
}

/// Fin (exclusive) d'un nombre signé `-?\d+(\.\d+)?` commençant à `debut`,
/// partie entière obligatoire. None si rien ne correspond.
fn fin_nombre_signe(chars: &[char], debut: usize) -> Option<usize> {
    let mut i = debut;
    if i < chars.len() && chars[i] == '-' {
        i += 1;
    }

    let entier = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == entier {
        return None;
    }

    if i < chars.len() && chars[i] == '.' {
        let fraction = i + 1;
        let mut j = fraction;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j > fraction {
            return Some(j);
        }
    }

    Some(i)
}
