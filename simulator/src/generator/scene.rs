use anyhow::Context;
use boardcore::frame::{BoundingBox, Detection, FrameAncillary, FramePayload};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic board frame.
///
/// Stands in for the live recognizer: it lays hit/miss marks out on a
/// board-shaped lattice, jitters them, optionally drops the newest
/// marks, and hands them over in scrambled order the way a real
/// detector would.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub num_shots: usize,
    pub num_targets: usize,
    /// Probability that a generated mark is a hit.
    pub hit_ratio: f32,
    /// Maximum center displacement in pixels, per axis.
    pub jitter: i32,
    /// Number of marks removed from the top of the board, simulating a
    /// round still in progress.
    pub dropout: usize,
    pub seed: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            num_shots: 4,
            num_targets: 5,
            hit_ratio: 0.6,
            jitter: 8,
            dropout: 0,
            seed: 0,
            frame_width: 1280,
            frame_height: 720,
            description: None,
            scenario: None,
        }
    }
}

impl SceneConfig {
    fn normalized_shots(&self) -> usize {
        self.num_shots.max(1)
    }

    fn normalized_targets(&self) -> usize {
        self.num_targets.max(1)
    }
}

const MARK_HALF_SIZE: i32 = 18;

fn build_detections(config: &SceneConfig) -> anyhow::Result<Vec<Detection>> {
    let shots = config.normalized_shots();
    let targets = config.normalized_targets();

    let cell_width = (config.frame_width as i32 / targets as i32).max(1);
    let cell_height = (config.frame_height as i32 / shots as i32).max(1);
    let jitter = config
        .jitter
        .min(cell_width / 4)
        .min(cell_height / 4)
        .max(0);

    let cell_count = shots
        .checked_mul(targets)
        .context("overflow computing board cell count")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut detections = Vec::with_capacity(cell_count);

    for row in 0..shots {
        for col in 0..targets {
            let cx = col as i32 * cell_width + cell_width / 2 + rng.gen_range(-jitter..=jitter);
            let cy = row as i32 * cell_height + cell_height / 2 + rng.gen_range(-jitter..=jitter);
            let label = if rng.gen::<f32>() < config.hit_ratio {
                "maru"
            } else {
                "batsu"
            };
            let confidence = rng.gen_range(0.5..1.0);
            detections.push(Detection::new(
                label,
                BoundingBox::new(
                    cx - MARK_HALF_SIZE,
                    cy - MARK_HALF_SIZE,
                    cx + MARK_HALF_SIZE,
                    cy + MARK_HALF_SIZE,
                ),
                confidence,
            ));
        }
    }

    let dropout = config.dropout.min(detections.len());
    // Row 0 is the top of the board; dropping from the front removes
    // the marks a round in progress has not produced yet.
    detections.drain(0..dropout);
    detections.shuffle(&mut rng);

    Ok(detections)
}

pub fn build_frame_payload_from_config(config: &SceneConfig) -> anyhow::Result<FramePayload> {
    let detections = build_detections(config)
        .with_context(|| format!("generating scene (seed {})", config.seed))?;
    let ancillary = FrameAncillary {
        timestamp: 0.0,
        frame_width: config.frame_width,
        frame_height: config.frame_height,
    };
    Ok(FramePayload::new(detections, ancillary))
}

pub fn build_frame_payload(num_shots: usize, num_targets: usize) -> anyhow::Result<FramePayload> {
    let config = SceneConfig {
        num_shots,
        num_targets,
        ..Default::default()
    };
    build_frame_payload_from_config(&config)
}
