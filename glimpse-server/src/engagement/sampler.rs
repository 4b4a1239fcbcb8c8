use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

/// Pick up to `requested` distinct actors from the pool
///
/// Sampling is without replacement, so the result holds no duplicates
/// and its length is `min(requested, pool.len())`.
pub fn assign_actors<R: Rng>(pool: &[Uuid], requested: u64, rng: &mut R) -> Vec<Uuid> {
    let take = (requested as usize).min(pool.len());
    pool.choose_multiple(rng, take).copied().collect()
}
