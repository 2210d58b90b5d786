//! Noyau calculette
//!
//! Organisation interne :
//! - erreurs.rs      : taxonomie d'erreurs (structurelles + domaine)
//! - nettoyage.rs    : normalisation du texte (casse, espaces, virgules, symboles)
//! - jetons.rs       : tokenisation
//! - expr.rs         : AST (Nombre / Unaire / Binaire) + précédence
//! - analyse.rs      : analyse en une passe avec insertion par précédence
//! - eval.rs         : résolution exacte/approchée
//! - affichage.rs    : rendu décimal (texte) du résultat
//! - calculatrice.rs : instance (options + table de variables) + pipeline

pub mod affichage;
pub mod analyse;
pub mod calculatrice;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod nettoyage;


#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use calculatrice::{Calculatrice, Demarche, Options};
pub use erreurs::Erreur;
