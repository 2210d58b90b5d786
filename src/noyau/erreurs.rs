// src/noyau/erreurs.rs
//
// Taxonomie complète des échecs du pipeline.
// Politique: toute erreur structurelle ou de domaine interrompt l'appel
// entier. Jamais de résultat partiel, rien n'est réessayé.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Erreur {
    #[error("entrée vide")]
    EntreeVide,

    /// Position (en caractères) dans le texte normalisé.
    #[error("caractère invalide à la position {0}")]
    CaractereInvalide(usize),

    #[error("suite d'opérateurs invalide")]
    SuiteOperateurs,

    #[error("suite de fonctions invalide")]
    SuiteFonctions,

    #[error("variable ou constante inconnue: {0}")]
    IdentifiantInconnu(String),

    /// Opérateur ou fonction encore en attente en fin d'expression.
    #[error("opérateur ou fonction en suspens")]
    EnSuspens,

    #[error("affectation mal placée")]
    AffectationMalPlacee,

    /// Erreur arithmétique de domaine (division par zéro, racine d'un
    /// négatif, factorielle invalide, ...).
    #[error("domaine: {0}")]
    Domaine(&'static str),
}
