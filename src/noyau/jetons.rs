// src/noyau/jetons.rs
//
// Tokenisation du texte normalisé, en un seul balayage gauche-droite,
// sans retour arrière.
//
// Règles:
// - jetons mono-caractère: ( ) + * / ^ % = !
// - '-' : selon le caractère PRÉCÉDENT, soit opérateur de soustraction,
//   soit début de nombre signé / fonction de négation
// - chiffres: littéral numérique glouton (-?(\d*\.)?\d+)
// - lettres minuscules: plus longue suite; fonction si suivie de '(' et
//   reconnue, variable sinon
// - tout autre caractère: jeton invalide (position) et ARRÊT du balayage

use num_bigint::BigInt;
use num_rational::BigRational;

use super::expr::{Fonction, Operateur};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Jeton {
    Ouvrante,
    Fermante,
    Op(Operateur),
    Fonction(Fonction),
    Variable(String),
    Affectation,
    /// Texte du littéral, converti à l'analyse.
    Nombre(String),
    /// Position (en caractères) du caractère fautif. Toujours en dernière
    /// position: le balayage s'arrête dessus.
    Invalide(usize),
}

/// Tokenize une chaîne normalisée en jetons.
/// Ne retourne jamais d'erreur: un caractère irrécupérable produit un
/// jeton `Invalide` final.
pub fn decoupe(s: &str) -> Vec<Jeton> {
    let chars: Vec<char> = s.chars().collect();
    let mut sortie = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        // Jetons mono-caractère (hors '-')
        match c {
            '(' => {
                sortie.push(Jeton::Ouvrante);
                i += 1;
                continue;
            }
            ')' => {
                sortie.push(Jeton::Fermante);
                i += 1;
                continue;
            }
            '+' => {
                sortie.push(Jeton::Op(Operateur::Plus));
                i += 1;
                continue;
            }
            '*' => {
                sortie.push(Jeton::Op(Operateur::Fois));
                i += 1;
                continue;
            }
            '/' => {
                sortie.push(Jeton::Op(Operateur::Division));
                i += 1;
                continue;
            }
            '^' => {
                sortie.push(Jeton::Op(Operateur::Puissance));
                i += 1;
                continue;
            }
            '%' => {
                sortie.push(Jeton::Op(Operateur::Modulo));
                i += 1;
                continue;
            }
            '=' => {
                sortie.push(Jeton::Affectation);
                i += 1;
                continue;
            }
            '!' => {
                sortie.push(Jeton::Fonction(Fonction::Factorielle));
                i += 1;
                continue;
            }
            _ => {}
        }

        // '-', nombres signés, négation
        if c == '-' || c.is_ascii_digit() {
            if c == '-' && i > 0 {
                // Le caractère précédent décide: après un opérateur, une
                // ouvrante ou '=', le '-' entame un nombre signé / une
                // négation; sinon c'est une soustraction.
                match chars[i - 1] {
                    '+' | '-' | '*' | '/' | '^' | '%' | '(' | '=' => {}
                    _ => {
                        sortie.push(Jeton::Op(Operateur::Moins));
                        i += 1;
                        continue;
                    }
                }
            }

            if let Some(fin) = fin_litteral(&chars, i) {
                sortie.push(Jeton::Nombre(chars[i..fin].iter().collect()));
                i = fin;
            } else {
                // '-' sans nombre derrière: négation (ex: -( ou -sqrt(4))
                sortie.push(Jeton::Fonction(Fonction::Negation));
                i += 1;
            }
            continue;
        }

        // Suites de lettres minuscules: fonction ou variable
        if c.is_ascii_lowercase() {
            let debut = i;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                i += 1;
            }
            let mot: String = chars[debut..i].iter().collect();

            let fonction = if i < chars.len() && chars[i] == '(' {
                fonction_nommee(&mot)
            } else {
                None
            };

            match fonction {
                Some(f) => sortie.push(Jeton::Fonction(f)),
                None => sortie.push(Jeton::Variable(mot)),
            }
            continue;
        }

        // Caractère irrécupérable: jeton invalide et arrêt immédiat.
        sortie.push(Jeton::Invalide(i));
        break;
    }

    sortie
}

/// Fin (exclusive) du plus long littéral `-?(\d*\.)?\d+` commençant à
/// `debut`. Comme la regex d'origine, un '.' sans chiffre derrière n'est
/// pas consommé ("12." correspond sur "12").
fn fin_litteral(chars: &[char], debut: usize) -> Option<usize> {
    let mut i = debut;
    if i < chars.len() && chars[i] == '-' {
        i += 1;
    }

    let entier = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
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

    if i > entier {
        Some(i)
    } else {
        None
    }
}

/// Noms de fonctions reconnus quand la suite de lettres est collée à '('.
fn fonction_nommee(mot: &str) -> Option<Fonction> {
    let f = match mot {
        "sqrt" => Fonction::Racine,
        "log" => Fonction::Log,
        "sin" => Fonction::Sin,
        "asin" => Fonction::Asin,
        "cos" => Fonction::Cos,
        "acos" => Fonction::Acos,
        "tan" => Fonction::Tan,
        "atan" => Fonction::Atan,
        "ln" => Fonction::Ln,
        "abs" => Fonction::Abs,
        "sign" => Fonction::Signe,
        _ => return None,
    };
    Some(f)
}

/// Convertit le texte d'un littéral (`-?(\d*\.)?\d+`) en rationnel exact.
pub(crate) fn valeur_nombre(texte: &str) -> Option<BigRational> {
    let (negatif, chiffres) = match texte.strip_prefix('-') {
        Some(reste) => (true, reste),
        None => (false, texte),
    };

    let (entier, fraction) = match chiffres.split_once('.') {
        Some((e, f)) => (e, f),
        None => (chiffres, ""),
    };

    let concat = format!("{entier}{fraction}");
    let numerateur = BigInt::parse_bytes(concat.as_bytes(), 10)?;
    let denominateur = BigInt::from(10u32).pow(fraction.len() as u32);

    let valeur = BigRational::new(numerateur, denominateur);
    Some(if negatif { -valeur } else { valeur })
}

/// Format utilitaire (démarche/debug): liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    let mut morceaux = Vec::new();
    for j in jetons {
        let s = match j {
            Jeton::Ouvrante => "(".to_string(),
            Jeton::Fermante => ")".to_string(),
            Jeton::Op(op) => op.to_string(),
            Jeton::Fonction(f) => f.to_string(),
            Jeton::Variable(nom) => nom.clone(),
            Jeton::Affectation => "=".to_string(),
            Jeton::Nombre(texte) => texte.clone(),
            Jeton::Invalide(pos) => format!("<invalide@{pos}>"),
        };
        morceaux.push(s);
    }
    morceaux.join(" ")
}
