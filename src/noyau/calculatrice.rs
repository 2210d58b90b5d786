// src/noyau/calculatrice.rs
//
// Instance de calcul: options + table de variables, pour une session
// logique. Pipeline réel:
//
//   nettoyage -> jetons -> analyse -> arbre -> résolution
//
// La table appartient à l'instance et survit aux appels; elle n'est
// mutée que par une affectation activée. Pas de partage implicite: une
// instance par session (sérialiser l'accès à l'extérieur au besoin).

use std::collections::HashMap;
use std::sync::OnceLock;

use num_rational::BigRational;

use super::analyse;
use super::erreurs::Erreur;
use super::eval;
use super::jetons;
use super::nettoyage;

/// Options d'une instance (miroir de la configuration du collaborateur).
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// `nom=expr` met à jour la table de variables.
    pub affectation: bool,
    /// Remplit la démarche. Observabilité seulement: ne change jamais le
    /// résultat.
    pub debug: bool,
    /// Substitution des glyphes Unicode (π, ×, ÷, √, …) au nettoyage.
    pub symboles: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            affectation: true,
            debug: false,
            symboles: true,
        }
    }
}

/// Trace des étapes du pipeline (texte), remplie seulement en debug.
#[derive(Clone, Debug, Default)]
pub struct Demarche {
    pub nettoye: String,
    pub jetons: String,
    pub arbre: String,
}

/// Calculatrice d'expressions: une ligne de texte, un rationnel en sortie.
///
/// Entièrement synchrone et déterministe. La récursion (parenthèses
/// imbriquées) est bornée par la pile d'appels: borner la longueur des
/// entrées non sûres à l'extérieur.
pub struct Calculatrice {
    pub options: Options,
    variables: HashMap<String, BigRational>,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Calculatrice {
    /// Instance neuve: table pré-remplie avec les constantes pi, e, phi.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            variables: constantes().clone(),
        }
    }

    /// Évalue une expression et retourne sa valeur.
    pub fn calcule(&mut self, expression: &str) -> Result<BigRational, Erreur> {
        self.calcule_detail(expression).map(|(valeur, _)| valeur)
    }

    /// Évalue une expression et retourne (valeur, démarche).
    pub fn calcule_detail(
        &mut self,
        expression: &str,
    ) -> Result<(BigRational, Demarche), Erreur> {
        if expression.is_empty() {
            return Err(Erreur::EntreeVide);
        }

        // 1) Normalisation
        let nettoye = nettoyage::nettoie(expression, self.options.symboles);

        // 2) Jetons
        let jetons = jetons::decoupe(&nettoye);

        // 3) Arbre (l'affectation mute la table pendant l'analyse)
        let mut ctx = analyse::Contexte {
            variables: &mut self.variables,
            affectation: self.options.affectation,
        };
        let arbre = analyse::analyse(&jetons, &mut ctx)?;

        // 4) Résolution
        let valeur = eval::resoudre(&arbre)?;

        // 5) Démarche
        let demarche = if self.options.debug {
            Demarche {
                nettoye,
                jetons: jetons::format_jetons(&jetons),
                arbre: arbre.to_string(),
            }
        } else {
            Demarche::default()
        };

        Ok((valeur, demarche))
    }
}

/* ------------------------ Constantes (table figée) ------------------------ */

static CONSTANTES: OnceLock<HashMap<String, BigRational>> = OnceLock::new();

/// Constantes pré-semées (28 chiffres significatifs).
fn constantes() -> &'static HashMap<String, BigRational> {
    CONSTANTES.get_or_init(|| {
        let mut table = HashMap::new();
        for (nom, texte) in [
            ("pi", "3.1415926535897932384626433833"),
            ("e", "2.7182818284590452353602874714"),
            ("phi", "1.6180339887498948482045868344"),
        ] {
            let valeur = jetons::valeur_nombre(texte).expect("constante illisible");
            table.insert(nom.to_string(), valeur);
        }
        table
    })
}
