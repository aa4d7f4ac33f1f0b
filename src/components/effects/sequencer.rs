//! One-shot fire intro timeline.

use super::config::SequenceConfig;

/// A step of the intro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
	StartFire,
	StopFire,
	StartLightning,
}

/// Emits each cue once, when the elapsed time since page-ready reaches its
/// offset. Once abandoned it emits nothing further.
#[derive(Clone, Debug)]
pub struct Sequencer {
	timeline: Vec<(f64, Cue)>,
	emitted: usize,
	abandoned: bool,
}

impl Sequencer {
	pub fn new(config: &SequenceConfig) -> Self {
		let start = config.delay_ms.max(0.0);
		let end = start + config.duration_ms.max(0.0);
		let mut timeline = vec![(start, Cue::StartFire), (end, Cue::StopFire)];
		if config.chain_lightning {
			timeline.push((end, Cue::StartLightning));
		}
		Self {
			timeline,
			emitted: 0,
			abandoned: false,
		}
	}

	/// Every cue with its offset from page-ready, in firing order.
	pub fn timeline(&self) -> &[(f64, Cue)] {
		&self.timeline
	}

	/// Cues that became due at `elapsed_ms` and have not been emitted yet.
	pub fn due(&mut self, elapsed_ms: f64) -> Vec<Cue> {
		if self.abandoned {
			return Vec::new();
		}
		let pending = &self.timeline[self.emitted..];
		let ready = pending
			.iter()
			.take_while(|(offset, _)| *offset <= elapsed_ms)
			.map(|(_, cue)| *cue)
			.collect::<Vec<_>>();
		self.emitted += ready.len();
		ready
	}

	/// Drop every remaining cue. The intro never resumes.
	pub fn abandon(&mut self) {
		self.abandoned = true;
	}

	pub fn is_finished(&self) -> bool {
		self.abandoned || self.emitted == self.timeline.len()
	}

	/// Whether this sequence will start lightning itself.
	pub fn chains_lightning(&self) -> bool {
		self.timeline
			.iter()
			.any(|(_, cue)| *cue == Cue::StartLightning)
	}
}
