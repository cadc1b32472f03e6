//! Procedural expansion of a seed word into a star-shaped starter map.

use std::f64::consts::PI;

use rand::Rng;
use rand::seq::SliceRandom;

use super::types::{Graph, Link, Node, ROOT_ID, palette_color};

const SUFFIXES: &[&str] = &["Lab", "Flow", "Map", "Drop", "Seed", "Spark", "Scope", "Nest", "Wave"];
const VERBS: &[&str] = &["plan", "find", "build", "dream", "sketch", "shape", "grow", "trace"];
const ADJECTIVES: &[&str] = &["bright", "calm", "wild", "tiny", "bold", "clear", "urban"];

const CHUNK_LEN: usize = 4;
const MIN_CHILDREN: usize = 5;
const MAX_CHILDREN: usize = 9;
const ANGLE_JITTER: f64 = 0.3;
const MIN_ORBIT: f64 = 110.0;
const MAX_ORBIT: f64 = 220.0;

fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Every label the generator may pick for `base` (already lowercased).
pub fn candidate_pool(base: &str) -> Vec<String> {
	let capitalized = capitalize(base);
	let mut pool: Vec<String> = SUFFIXES
		.iter()
		.map(|suffix| format!("{capitalized} {suffix}"))
		.collect();
	pool.extend(VERBS.iter().map(|verb| format!("{verb} {base}")));
	pool.extend(ADJECTIVES.iter().map(|adj| format!("{} {base}", capitalize(adj))));

	let chars: Vec<char> = base.chars().collect();
	pool.extend(
		chars
			.chunks(CHUNK_LEN)
			.enumerate()
			.map(|(i, chunk)| format!("{}{i}", chunk.iter().collect::<String>())),
	);
	pool
}

/// Builds a root node for `seed` at `center` surrounded by 5 to 9 linked children.
///
/// The seed must already be trimmed and non-empty; callers validate it.
pub fn generate<R: Rng + ?Sized>(seed: &str, center: (f64, f64), rng: &mut R) -> Graph {
	let base = seed.to_lowercase();
	let (cx, cy) = center;

	let mut pool = candidate_pool(&base);
	pool.shuffle(rng);
	let count = rng.random_range(MIN_CHILDREN..=MAX_CHILDREN).min(pool.len());
	pool.truncate(count);

	let mut nodes = Vec::with_capacity(count + 1);
	let mut links = Vec::with_capacity(count);
	nodes.push(Node::new(ROOT_ID, base, cx, cy, palette_color(0)));

	for (idx, text) in pool.into_iter().enumerate() {
		let angle = (idx as f64 / count as f64) * 2.0 * PI + rng.random_range(-ANGLE_JITTER..=ANGLE_JITTER);
		let orbit = rng.random_range(MIN_ORBIT..=MAX_ORBIT);
		let id = format!("n{}", idx + 1);
		nodes.push(Node::new(
			id.clone(),
			text,
			cx + angle.cos() * orbit,
			cy + angle.sin() * orbit,
			palette_color(idx + 1),
		));
		links.push(Link::new(ROOT_ID, id));
	}

	Graph::new(nodes, links)
}
