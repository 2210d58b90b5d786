//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - grammaire contrôlée: seules les erreurs de domaine sont attendues
//! - invariant clé : même entrée + même table => même résultat

use std::time::{Duration, Instant};

use super::calculatrice::Calculatrice;
use super::erreurs::Erreur;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {max:?}");
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 => "0".to_string(),
        1 | 2 => format!("{}", rng.pick(10)),
        3 => format!("-{}", 1 + rng.pick(9)),
        4 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        5 => "pi".to_string(),
        _ => "e".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    match rng.pick(13) {
        0 | 1 => gen_atome(rng),
        2 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}*{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        6 => format!("({}%{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        7 => format!("({}^{})", gen_atome(rng), rng.pick(6)),
        8 => format!("sqrt({})", gen_expr(rng, depth - 1)),
        9 => format!("abs({})", gen_expr(rng, depth - 1)),
        10 => format!("sin({})", gen_expr(rng, depth - 1)),
        // hors domaine garanti (racine d'un négatif)
        11 => format!("sqrt(0-{})", 1 + rng.pick(9)),
        _ => format!("{}!", rng.pick(8)),
    }
}

/// Caractères arbitraires (y compris fautifs): le pipeline doit répondre
/// par une valeur ou une erreur, jamais paniquer.
fn gen_brut(rng: &mut Rng) -> String {
    const CHARSET: &[char] = &[
        '0', '1', '2', '9', '+', '-', '*', '/', '^', '%', '(', ')', '!', '=', '.', ',', 'x',
        'p', 'i', 's', 'q', 'r', 't', ' ', '√', '×', '$', '#',
    ];
    let longueur = 1 + rng.pick(24) as usize;
    (0..longueur)
        .map(|_| CHARSET[rng.pick(CHARSET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Helpers fuzz ------------------------ */

fn est_erreur_attendue(e: &Erreur) -> bool {
    // Grammaire contrôlée: seul le domaine peut échouer
    // (division par zéro, racine d'un négatif, asin hors [-1,1], ...).
    matches!(e, Erreur::Domaine(_))
}

fn resultat_texte(calc: &mut Calculatrice, expr: &str) -> String {
    match calc.calcule(expr) {
        Ok(v) => format!("ok:{v}"),
        Err(e) => format!("err:{e}"),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut suivant = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                suivant.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                suivant.push(items[i].clone());
                i += 1;
            }
        }
        items = suivant;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_grammaire_et_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut vus_ok = 0usize;
    let mut vus_err = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let mut calc = Calculatrice::default();

        match calc.calcule(&expr) {
            Ok(premier) => {
                // même entrée, même table => même valeur
                assert_eq!(calc.calcule(&expr), Ok(premier), "expr={expr:?}");
                vus_ok += 1;
            }
            Err(e) => {
                assert!(
                    est_erreur_attendue(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                vus_err += 1;
            }
        }
    }

    // On veut un mix des deux, sinon le fuzz ne balaye rien.
    assert!(vus_ok > 20, "trop peu de succès: {vus_ok}");
    assert!(vus_err > 0, "aucune erreur vue: fuzz trop sage");
}

#[test]
fn fuzz_safe_brut_jamais_de_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng_a = Rng::new(0xBADC0DE_u64);
    let mut rng_b = rng_a.clone();

    let mut sorties_a = Vec::new();
    let mut sorties_b = Vec::new();

    for _ in 0..300 {
        budget(t0, max);
        let expr = gen_brut(&mut rng_a);
        sorties_a.push(resultat_texte(&mut Calculatrice::default(), &expr));
    }
    for _ in 0..300 {
        budget(t0, max);
        let expr = gen_brut(&mut rng_b);
        sorties_b.push(resultat_texte(&mut Calculatrice::default(), &expr));
    }

    // Deux passes, même seed: sorties identiques.
    assert_eq!(sorties_a, sorties_b);
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let expr = somme_balancee("1", 800);
    budget(t0, max);

    let valeur = Calculatrice::default()
        .calcule(&expr)
        .unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(valeur.to_string(), "800");
}
