// src/noyau/eval.rs
//
// Résolution d'un arbre en valeur, de bas en haut.
//
// Politique numérique à deux chemins:
// - chemin EXACT (rationnels à grande plage): toujours pour + - %,
//   et pour * / ^ log quand les DEUX opérandes sont entiers
//   (2^10 vaut exactement 1024)
// - chemin APPROCHÉ (flottants): dès qu'un opérande est fractionnaire,
//   aller-retour par f64 (arrondi flottant accepté pour les opérations
//   à tendance transcendante)
//
// Toute erreur de domaine interrompt l'appel entier.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::f64::consts::PI;

use super::erreurs::Erreur;
use super::expr::{Expr, Fonction, Operateur};

// Garde-fous sur les chemins exacts: au-delà, erreur de domaine
// (l'entier exact deviendrait arbitrairement coûteux).
const FACTORIELLE_MAX: i64 = 10_000;
const EXPOSANT_MAX: i64 = 10_000;

/// Réduit un arbre en rationnel exact ou signale une erreur de domaine.
pub(crate) fn resoudre(expr: &Expr) -> Result<BigRational, Erreur> {
    match expr {
        Expr::Nombre(valeur) => Ok(valeur.clone()),

        Expr::Unaire(operande, fonction) => {
            let v = resoudre(operande)?;
            applique_fonction(v, *fonction)
        }

        Expr::Binaire(gauche, droite, op) => {
            let a = resoudre(gauche)?;
            let b = resoudre(droite)?;
            applique_operateur(a, b, *op)
        }
    }
}

/* ------------------------ Opérateurs binaires ------------------------ */

fn applique_operateur(
    a: BigRational,
    b: BigRational,
    op: Operateur,
) -> Result<BigRational, Erreur> {
    let entiers = a.is_integer() && b.is_integer();

    match op {
        Operateur::Plus => Ok(a + b),
        Operateur::Moins => Ok(a - b),

        Operateur::Modulo => {
            if b.is_zero() {
                return Err(Erreur::Domaine("division par zéro"));
            }
            // Reste de la division tronquée: même signe que le dividende.
            Ok(reste_tronque(a, b))
        }

        Operateur::Fois => {
            if entiers {
                Ok(a * b)
            } else {
                par_flottants(&a, &b, |x, y| x * y)
            }
        }

        Operateur::Division => {
            if b.is_zero() {
                return Err(Erreur::Domaine("division par zéro"));
            }
            if entiers {
                Ok(a / b)
            } else {
                par_flottants(&a, &b, |x, y| x / y)
            }
        }

        Operateur::Puissance => puissance(a, b, entiers),
        Operateur::Logarithme => logarithme(a, b, entiers),
    }
}

fn reste_tronque(a: BigRational, b: BigRational) -> BigRational {
    let quotient = (&a / &b).trunc();
    a - b * quotient
}

fn puissance(a: BigRational, b: BigRational, entiers: bool) -> Result<BigRational, Erreur> {
    if entiers {
        let n = b
            .to_integer()
            .to_i64()
            .filter(|n| (-EXPOSANT_MAX..=EXPOSANT_MAX).contains(n))
            .ok_or(Erreur::Domaine("exposant hors limites"))?;
        if a.is_zero() && n < 0 {
            return Err(Erreur::Domaine("division par zéro"));
        }
        return Ok(puissance_rationnelle(a, n));
    }

    let x = en_flottant(&a)?;
    let y = en_flottant(&b)?;
    depuis_flottant(x.powf(y))
}

/// log en base A de B (A = opérande gauche).
fn logarithme(a: BigRational, b: BigRational, entiers: bool) -> Result<BigRational, Erreur> {
    let base = en_flottant(&a)?;
    let valeur = en_flottant(&b)?;
    if base <= 0.0 || base == 1.0 || valeur <= 0.0 {
        return Err(Erreur::Domaine("logarithme hors domaine"));
    }

    let brut = valeur.log(base);

    // Chemin exact: si base^k reproduit exactement l'opérande, k est la
    // réponse entière exacte (log2(1024) = 10, sans arrondi flottant).
    if entiers && brut.is_finite() {
        let k = brut.round();
        if k.abs() <= EXPOSANT_MAX as f64 {
            let ki = k as i64;
            if puissance_rationnelle(a.clone(), ki) == b {
                return Ok(BigRational::from_integer(BigInt::from(ki)));
            }
        }
    }

    depuis_flottant(brut)
}

/* ------------------------ Fonctions unaires ------------------------ */

fn applique_fonction(v: BigRational, fonction: Fonction) -> Result<BigRational, Erreur> {
    match fonction {
        Fonction::Identite => Ok(v),
        Fonction::Negation => Ok(-v),
        Fonction::Abs => Ok(v.abs()),

        Fonction::Signe => {
            let signe = if v.is_zero() {
                0
            } else if v.is_negative() {
                -1
            } else {
                1
            };
            Ok(BigRational::from_integer(BigInt::from(signe)))
        }

        Fonction::Racine => racine(v),

        Fonction::Log => {
            if !v.is_positive() {
                return Err(Erreur::Domaine("logarithme d'un argument non positif"));
            }
            flottant_unaire(&v, f64::log10)
        }
        Fonction::Ln => {
            if !v.is_positive() {
                return Err(Erreur::Domaine("logarithme d'un argument non positif"));
            }
            flottant_unaire(&v, f64::ln)
        }

        Fonction::Sin => flottant_unaire(&v, f64::sin),
        Fonction::Cos => flottant_unaire(&v, f64::cos),
        Fonction::Tan => flottant_unaire(&v, f64::tan),
        // asin/acos hors [-1, 1]: NaN, signalé par le retour flottant
        Fonction::Asin => flottant_unaire(&v, f64::asin),
        Fonction::Acos => flottant_unaire(&v, f64::acos),
        Fonction::Atan => flottant_unaire(&v, f64::atan),

        Fonction::Factorielle => factorielle(v),
    }
}

fn racine(v: BigRational) -> Result<BigRational, Erreur> {
    if v.is_negative() {
        return Err(Erreur::Domaine("racine carrée d'un argument négatif"));
    }
    // Carré parfait rationnel: résultat exact.
    if let Some(exacte) = racine_exacte(&v) {
        return Ok(exacte);
    }
    flottant_unaire(&v, f64::sqrt)
}

/// n! exact pour les entiers >= 0 (borné), prolongement Γ(n+1) sinon.
fn factorielle(v: BigRational) -> Result<BigRational, Erreur> {
    if v.is_integer() && !v.is_negative() {
        let n = v
            .to_integer()
            .to_i64()
            .filter(|&n| n <= FACTORIELLE_MAX)
            .ok_or(Erreur::Domaine("factorielle trop grande"))?;
        let mut produit = BigInt::one();
        for k in 2..=n {
            produit *= k;
        }
        return Ok(BigRational::from_integer(produit));
    }

    // Entiers négatifs: pôles de Γ => non fini => erreur de domaine.
    let x = en_flottant(&v)?;
    let g = gamma(x + 1.0);
    if !g.is_finite() {
        return Err(Erreur::Domaine("factorielle invalide"));
    }
    depuis_flottant(g)
}

/// Γ(z) par l'approximation de Lanczos (g = 7, 9 coefficients),
/// réflexion pour z < 1/2.
fn gamma(z: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    const G: f64 = 7.0;

    if z < 0.5 {
        return PI / ((PI * z).sin() * gamma(1.0 - z));
    }

    let z = z - 1.0;
    let mut x = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        x += c / (z + i as f64);
    }
    let t = z + G + 0.5;
    (2.0 * PI).sqrt() * t.powf(z + 0.5) * (-t).exp() * x
}

/* ------------------------ Outils rationnels exacts ------------------------ */

fn puissance_rationnelle(base: BigRational, exposant: i64) -> BigRational {
    if exposant == 0 {
        return BigRational::one();
    }
    if exposant < 0 {
        return BigRational::one() / puissance_rationnelle(base, -exposant);
    }

    let mut e = exposant as u64;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b = b.clone() * b;
        }
    }
    acc
}

fn racine_exacte(r: &BigRational) -> Option<BigRational> {
    let n = racine_entiere_exacte(r.numer())?;
    let d = racine_entiere_exacte(r.denom())?;
    Some(BigRational::new(n, d))
}

fn racine_entiere_exacte(x: &BigInt) -> Option<BigInt> {
    let s = racine_entiere_plancher(x);
    if &s * &s == *x {
        Some(s)
    } else {
        None
    }
}

/// Plancher de √x par Newton sur entiers (x >= 0).
fn racine_entiere_plancher(x: &BigInt) -> BigInt {
    if x.is_zero() {
        return BigInt::zero();
    }

    let mut y = BigInt::one() << x.bits().div_ceil(2);
    loop {
        let y_suiv = (&y + (x / &y)) >> 1;
        if y_suiv >= y {
            let mut z = y_suiv;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_suiv;
    }
}

/* ------------------------ Aller-retour flottant ------------------------ */

fn en_flottant(v: &BigRational) -> Result<f64, Erreur> {
    v.to_f64()
        .ok_or(Erreur::Domaine("valeur hors du domaine flottant"))
}

fn depuis_flottant(v: f64) -> Result<BigRational, Erreur> {
    if !v.is_finite() {
        return Err(Erreur::Domaine("résultat non fini"));
    }
    BigRational::from_float(v).ok_or(Erreur::Domaine("résultat non fini"))
}

fn flottant_unaire(v: &BigRational, f: fn(f64) -> f64) -> Result<BigRational, Erreur> {
    depuis_flottant(f(en_flottant(v)?))
}

fn par_flottants(
    a: &BigRational,
    b: &BigRational,
    f: fn(f64, f64) -> f64,
) -> Result<BigRational, Erreur> {
    depuis_flottant(f(en_flottant(a)?, en_flottant(b)?))
}
