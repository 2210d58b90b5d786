// src/lib.rs
//
// Calculette — noyau d'évaluation d'expressions
// ----------------------------------------------
// But:
// - une ligne de texte en entrée, un nombre (ou une erreur) en sortie
// - pipeline: nettoyage -> jetons -> analyse -> arbre -> résolution
// - chemin exact (rationnels) + chemin approché (flottants)
//
// IMPORTANT (structure projet):
// - la console/REPL est un collaborateur EXTERNE: ce crate n'a pas de main
// - tout le noyau vit dans src/noyau/

pub mod noyau;

pub use noyau::calculatrice::{Calculatrice, Demarche, Options};
pub use noyau::erreurs::Erreur;
