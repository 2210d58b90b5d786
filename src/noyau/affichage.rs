// src/noyau/affichage.rs
//
// Rendu décimal (texte) d'un rationnel, pour la couche de présentation
// (console/REPL externe). Troncature à `decimales` chiffres, zéros de
// queue retirés. Aucune erreur possible.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

/// Rend `r` en texte décimal tronqué à `decimales` chiffres après la
/// virgule, sans zéros de queue ("1024", "2.5", "0.33333").
pub fn en_decimales(r: &BigRational, decimales: usize) -> String {
    let negatif = r.is_negative();
    let absolu = r.abs();

    let echelle = BigInt::from(10u32).pow(decimales as u32);
    // entier "échelonné" = troncature de |r| * 10^decimales
    let echelonne = (absolu.numer() * &echelle) / absolu.denom();

    let partie_entiere = &echelonne / &echelle;
    let partie_fraction = &echelonne % &echelle;

    let mut fraction = partie_fraction.to_str_radix(10);
    while fraction.len() < decimales {
        fraction.insert(0, '0');
    }
    while fraction.ends_with('0') {
        fraction.pop();
    }

    let signe = if negatif && (!partie_entiere.is_zero() || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{signe}{partie_entiere}")
    } else {
        format!("{signe}{partie_entiere}.{fraction}")
    }
}
