use i2b2_model::Fact;
use rand::Rng;
use rand::seq::index;

/// Keeps `n` distinct facts chosen at random, in their original order.
/// Every fact is kept when `n >= facts.len()`.
pub fn sample_facts<R: Rng + ?Sized>(facts: Vec<Fact>, n: usize, rng: &mut R) -> Vec<Fact> {
    if n >= facts.len() {
        return facts;
    }
    let mut chosen = index::sample(rng, facts.len(), n).into_vec();
    chosen.sort_unstable();
    let mut chosen = chosen.into_iter().peekable();
    facts
        .into_iter()
        .enumerate()
        .filter_map(|(position, fact)| {
            if chosen.peek() == Some(&position) {
                chosen.next();
                Some(fact)
            } else {
                None
            }
        })
        .collect()
}
