use rand::Rng;
use rand::seq::SliceRandom;

/// Randomly permutes `items`, biased so that items with larger `weights`
/// tend to come first.
///
/// Every positive-weight item draws the key `u^(1/w)` and items are ordered
/// by descending key. Items with zero, negative or non-finite weight follow
/// all positive-weight items in uniform random order. With no weights, a
/// weight list of the wrong length, or all weights equal, the result is a
/// uniform shuffle.
pub fn weighted_shuffle<T, R>(mut items: Vec<T>, weights: &[f64], rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    if weights.len() != items.len() || weights.windows(2).all(|w| w[0] == w[1]) {
        items.shuffle(rng);
        return items;
    }

    let mut keyed: Vec<(f64, T)> = items
        .into_iter()
        .zip(weights)
        .map(|(item, &w)| {
            let u: f64 = rng.r#gen();
            let key = if w.is_finite() && w > 0.0 {
                u.powf(1.0 / w)
            } else {
                -1.0 - u
            };
            (key, item)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}
