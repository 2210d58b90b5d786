// src/noyau/expr.rs
//
// AST de l'expression: union fermée à trois variantes.
// - Nombre  : feuille rationnelle exacte, immuable
// - Unaire  : fonction appliquée à un opérande possédé
// - Binaire : opérateur + deux opérandes possédés
//
// La seule réécriture structurelle du système est l'insertion par
// précédence pendant l'analyse (analyse.rs), qui ne touche que des
// enfants droits le long de l'épine droite.

use num_rational::BigRational;
use num_traits::One;

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Division,
    Puissance,
    Modulo,
    /// Logarithme en base A de B (A = opérande gauche). Jamais produit par
    /// le tokenizer: réservé au niveau évaluateur.
    Logarithme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Negation,
    Racine,
    Log,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Abs,
    Signe,
    Factorielle,
    /// Enveloppe transparente autour d'un groupe parenthésé: protège le
    /// sous-arbre de l'insertion par précédence.
    Identite,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(BigRational),
    Unaire(Box<Expr>, Fonction),
    Binaire(Box<Expr>, Box<Expr>, Operateur),
}

/// Ordre des opérations (plus grand = plus prioritaire).
/// Les égalités ne déclenchent PAS de descente à l'insertion: elles lient
/// à gauche.
pub(crate) fn precedence(op: Operateur) -> u8 {
    match op {
        Operateur::Puissance | Operateur::Logarithme => 3,
        Operateur::Fois | Operateur::Division | Operateur::Modulo => 2,
        Operateur::Plus | Operateur::Moins => 1,
    }
}

impl fmt::Display for Operateur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operateur::Plus => "+",
            Operateur::Moins => "-",
            Operateur::Fois => "*",
            Operateur::Division => "/",
            Operateur::Puissance => "^",
            Operateur::Modulo => "%",
            Operateur::Logarithme => "log",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Fonction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Fonction::Negation => "-",
            Fonction::Racine => "sqrt",
            Fonction::Log => "log",
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Asin => "asin",
            Fonction::Acos => "acos",
            Fonction::Atan => "atan",
            Fonction::Ln => "ln",
            Fonction::Abs => "abs",
            Fonction::Signe => "sign",
            Fonction::Factorielle => "!",
            Fonction::Identite => "id",
        };
        write!(f, "{s}")
    }
}

/* ------------------------ Affichage debug (démarche) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nombre(r) => {
                let n = r.numer();
                let d = r.denom();
                if d.is_one() {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Expr::Unaire(x, Fonction::Identite) => write!(f, "({x})"),
            Expr::Unaire(x, Fonction::Negation) => write!(f, "-({x})"),
            Expr::Unaire(x, Fonction::Factorielle) => write!(f, "({x})!"),
            Expr::Unaire(x, fonction) => write!(f, "{fonction}({x})"),
            Expr::Binaire(a, b, Operateur::Logarithme) => write!(f, "log({a}, {b})"),
            Expr::Binaire(a, b, op) => write!(f, "({a}{op}{b})"),
        }
    }
}
