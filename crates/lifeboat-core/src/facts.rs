//! Titanic trivia shown next to the form.

use rand::seq::SliceRandom;

pub const FUN_FACTS: [&str; 5] = [
    "There were only 20 lifeboats on Titanic for about 2,200 people.",
    "The ship had a gym, swimming pool, Turkish bath, and even a squash court.",
    "Titanic’s top speed was about 23 knots (around 42 km/h).",
    "The famous 'Unsinkable' claim was mostly media hype, not an official slogan.",
    "About 60% of first-class passengers survived, but only ~25% of third-class.",
];

/// Pick one fact uniformly at random.
pub fn random_fact() -> &'static str {
    random_fact_with(&mut rand::thread_rng())
}

pub fn random_fact_with<R: rand::Rng + ?Sized>(rng: &mut R) -> &'static str {
    FUN_FACTS.choose(rng).copied().unwrap_or(FUN_FACTS[0])
}
