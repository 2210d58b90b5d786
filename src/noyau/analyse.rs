// src/noyau/analyse.rs
//
// Analyse en UNE passe avant, sans pile d'opérateurs:
// - un opérande complet est "rangé" dans l'arbre courant par insertion
//   par précédence (descente de l'épine droite, voir insere_precedence)
// - un groupe parenthésé est analysé récursivement puis enveloppé dans
//   une identité pour ne pas être redécoupé ensuite
// - parenthèses non appariées tolérées (dans les deux sens)
//
// Règles:
// - deux opérateurs de suite (ou un opérateur en tête) => erreur
// - deux fonctions de suite => erreur
// - variable en tête suivie de '=': le reste est analysé comme
//   sous-expression et devient le résultat de l'appel; si l'affectation
//   est active, la table est mise à jour avec sa valeur
// - en fin d'entrée, opérateur ou fonction en attente => erreur

use std::collections::HashMap;

use num_rational::BigRational;

use super::erreurs::Erreur;
use super::eval;
use super::expr::{precedence, Expr, Fonction, Operateur};
use super::jetons::{valeur_nombre, Jeton};

/// Contexte d'analyse: table de variables de l'instance + activation de
/// l'affectation. L'analyse est le seul point de mutation de la table.
pub(crate) struct Contexte<'a> {
    pub variables: &'a mut HashMap<String, BigRational>,
    pub affectation: bool,
}

#[derive(Default)]
struct Etat {
    resultat: Option<Expr>,
    op: Option<Operateur>,
    fonction: Option<Fonction>,
}

/// Analyse une suite de jetons en un arbre d'expression.
pub(crate) fn analyse(jetons: &[Jeton], ctx: &mut Contexte<'_>) -> Result<Expr, Erreur> {
    let Some(dernier) = jetons.last() else {
        return Err(Erreur::EntreeVide);
    };
    if let Jeton::Invalide(position) = dernier {
        return Err(Erreur::CaractereInvalide(*position));
    }

    // Raccourci: un littéral seul.
    if jetons.len() == 1 {
        if let Jeton::Nombre(texte) = &jetons[0] {
            return Ok(Expr::Nombre(nombre(texte)?));
        }
    }

    let mut etat = Etat::default();
    let mut profondeur: i32 = 0;
    let mut index_ouvrante: Option<usize> = None;

    for i in 0..jetons.len() {
        match &jetons[i] {
            Jeton::Ouvrante => {
                if profondeur == 0 {
                    index_ouvrante = Some(i);
                }
                profondeur += 1;
                continue;
            }

            Jeton::Fermante => {
                profondeur -= 1;

                if profondeur == 0 {
                    // Fermeture du groupe le plus externe: contenu strict
                    // entre les deux parenthèses.
                    if let Some(debut) = index_ouvrante {
                        let groupe = analyse(&jetons[debut + 1..i], ctx)?;
                        range_operande(&mut etat, identite(groupe), factorielle_suit(jetons, i))?;
                    }
                } else if profondeur == -1 && index_ouvrante.is_none() {
                    // Fermante orpheline sans ouvrante au dossier: on
                    // repart de zéro, tout ce qui précède devient le groupe.
                    let groupe = analyse(&jetons[..i], ctx)?;
                    etat = Etat::default();
                    profondeur = 0;
                    range_operande(&mut etat, identite(groupe), factorielle_suit(jetons, i))?;
                }
                // Sinon: profondeur reste négative, la suite est ignorée.
                continue;
            }

            _ => {}
        }

        if profondeur != 0 {
            continue;
        }

        match &jetons[i] {
            Jeton::Op(op) => {
                if etat.op.is_some() {
                    return Err(Erreur::SuiteOperateurs);
                }
                etat.op = Some(*op);
            }

            // La factorielle est postfixe: consommée par anticipation au
            // rangement de l'opérande qui la précède.
            Jeton::Fonction(Fonction::Factorielle) => {}

            Jeton::Fonction(f) => {
                if etat.fonction.is_some() {
                    return Err(Erreur::SuiteFonctions);
                }
                etat.fonction = Some(*f);
            }

            Jeton::Variable(nom) => {
                if i == 0 && matches!(jetons.get(1), Some(Jeton::Affectation)) {
                    let valeur_expr = analyse(&jetons[2..], ctx)?;
                    if ctx.affectation {
                        let valeur = eval::resoudre(&valeur_expr)?;
                        ctx.variables.insert(nom.clone(), valeur);
                    }
                    return Ok(valeur_expr);
                }

                let valeur = ctx
                    .variables
                    .get(nom)
                    .cloned()
                    .ok_or_else(|| Erreur::IdentifiantInconnu(nom.clone()))?;
                range_operande(&mut etat, Expr::Nombre(valeur), factorielle_suit(jetons, i))?;
            }

            Jeton::Nombre(texte) => {
                range_operande(&mut etat, Expr::Nombre(nombre(texte)?), factorielle_suit(jetons, i))?;
            }

            Jeton::Affectation => return Err(Erreur::AffectationMalPlacee),

            // Déjà traités (ou impossibles) ici.
            Jeton::Ouvrante | Jeton::Fermante | Jeton::Invalide(_) => {}
        }
    }

    // Ouvrante restée ouverte: tout ce qui suit est son contenu.
    if profondeur > 0 {
        if let Some(debut) = index_ouvrante {
            let groupe = analyse(&jetons[debut + 1..], ctx)?;
            range_operande(&mut etat, identite(groupe), false)?;
        }
    }

    if etat.fonction.is_some() || etat.op.is_some() {
        return Err(Erreur::EnSuspens);
    }
    etat.resultat.ok_or(Erreur::EntreeVide)
}

/// Range un opérande complet dans l'arbre en construction.
fn range_operande(etat: &mut Etat, operande: Expr, factorielle_suit: bool) -> Result<(), Erreur> {
    let mut courant = match etat.fonction.take() {
        Some(f) => Expr::Unaire(Box::new(operande), f),
        None => operande,
    };
    if factorielle_suit {
        courant = Expr::Unaire(Box::new(courant), Fonction::Factorielle);
    }

    // Deux opérandes sans opérateur entre eux (3pi, 5sqrt(4), (3+5)2):
    // multiplication implicite.
    if etat.resultat.is_some() && etat.op.is_none() {
        etat.op = Some(Operateur::Fois);
    }

    match etat.op.take() {
        Some(op) => match etat.resultat.take() {
            Some(resultat) => {
                etat.resultat = Some(insere_precedence(resultat, courant, op));
            }
            // Opérateur en tête d'expression, sans opérande à gauche.
            None => return Err(Erreur::SuiteOperateurs),
        },
        None => etat.resultat = Some(courant),
    }
    Ok(())
}

/// Insertion par précédence: descend l'épine droite tant que le nouvel
/// opérateur lie STRICTEMENT plus fort que le nœud courant, puis enveloppe
/// le point d'arrêt comme opérande gauche du nouveau nœud. Les égalités ne
/// descendent pas: elles lient à gauche (2^3^2 = (2^3)^2).
fn insere_precedence(resultat: Expr, operande: Expr, op: Operateur) -> Expr {
    match resultat {
        Expr::Binaire(gauche, droite, op_noeud) if precedence(op) > precedence(op_noeud) => {
            let droite = insere_precedence(*droite, operande, op);
            Expr::Binaire(gauche, Box::new(droite), op_noeud)
        }
        noeud => Expr::Binaire(Box::new(noeud), Box::new(operande), op),
    }
}

fn identite(groupe: Expr) -> Expr {
    Expr::Unaire(Box::new(groupe), Fonction::Identite)
}

fn factorielle_suit(jetons: &[Jeton], i: usize) -> bool {
    matches!(jetons.get(i + 1), Some(Jeton::Fonction(Fonction::Factorielle)))
}

fn nombre(texte: &str) -> Result<BigRational, Erreur> {
    // Le tokenizer garantit la forme du littéral; on reste prudent.
    valeur_nombre(texte).ok_or(Erreur::Domaine("nombre illisible"))
}
