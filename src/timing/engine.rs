// The sector timing state machine

use log::{info, warn};

use crate::conditions::TrackConditions;
use crate::store::SectorBestStore;
use crate::timing::{MAX_SECTORS, TelemetrySample, UNSET_TIME, should_update_session_best};
use crate::track_data::{SegmentSource, sector_of, turn_label};

/// Sector durations shorter than this are boundary-crossing glitches and
/// are discarded rather than recorded.
const MIN_SECTOR_TIME_SEC: f64 = 0.5;

/// A lap wrap is detected when the lap clock drops by more than this.
/// The tolerance absorbs telemetry jitter around the reset instant.
const LAP_TIME_RESET_TOLERANCE_SEC: f64 = 1.0;

/// Per-tick state machine that turns position/lap-clock samples into
/// per-sector lap timing.
///
/// The engine tracks four tiers per sector (current lap, last lap,
/// session best, all-time best), each cell either seconds or the
/// [`UNSET_TIME`] sentinel. It is single-threaded and synchronous: one
/// `update` per telemetry tick, blocking briefly on the store only when
/// a new all-time best is persisted or an identity change triggers a
/// bulk reload. Store failures are logged and never interrupt timing.
pub struct SectorTimingEngine {
    segments: Box<dyn SegmentSource>,
    store: Option<Box<dyn SectorBestStore>>,

    // display fields
    current_turn: String,
    current_sector_number: usize,
    sector_count: usize,
    track_id: String,
    position_pct: f64,
    current_sector_time_sec: f64,
    last_completed_sector_time_sec: f64,
    last_completed_sector_number: usize,

    // timing tiers, indexed 1..=MAX_SECTORS
    current_lap_sec: [f64; MAX_SECTORS + 1],
    last_lap_sec: [f64; MAX_SECTORS + 1],
    session_best_sec: [f64; MAX_SECTORS + 1],
    all_time_best_sec: [f64; MAX_SECTORS + 1],

    // bookkeeping
    prev_sector_number: usize,
    prev_position_pct: f64,
    prev_lap_time_sec: f64,
    sector_start_lap_time_sec: f64,
    car_model: String,
}

impl SectorTimingEngine {
    /// Engine without persistence; all-time bests live only in memory
    /// for the session.
    pub fn new(segments: Box<dyn SegmentSource>) -> Self {
        Self {
            segments,
            store: None,
            current_turn: String::new(),
            current_sector_number: 0,
            sector_count: 0,
            track_id: String::new(),
            position_pct: 0.0,
            current_sector_time_sec: UNSET_TIME,
            last_completed_sector_time_sec: UNSET_TIME,
            last_completed_sector_number: 0,
            current_lap_sec: [UNSET_TIME; MAX_SECTORS + 1],
            last_lap_sec: [UNSET_TIME; MAX_SECTORS + 1],
            session_best_sec: [UNSET_TIME; MAX_SECTORS + 1],
            all_time_best_sec: [UNSET_TIME; MAX_SECTORS + 1],
            prev_sector_number: 0,
            prev_position_pct: 0.0,
            prev_lap_time_sec: 0.0,
            sector_start_lap_time_sec: 0.0,
            car_model: String::new(),
        }
    }

    /// Engine backed by a durable sector best store.
    pub fn with_store(segments: Box<dyn SegmentSource>, store: Box<dyn SectorBestStore>) -> Self {
        let mut engine = Self::new(segments);
        engine.store = Some(store);
        engine
    }

    // ------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------

    pub fn current_turn(&self) -> &str {
        &self.current_turn
    }

    /// 1-based sector the car currently occupies; 0 when unmapped.
    pub fn current_sector_number(&self) -> usize {
        self.current_sector_number
    }

    pub fn sector_count(&self) -> usize {
        self.sector_count
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn position_pct(&self) -> f64 {
        self.position_pct
    }

    /// Seconds spent in the current sector so far.
    pub fn current_sector_time(&self) -> f64 {
        self.current_sector_time_sec
    }

    pub fn last_completed_sector_time(&self) -> f64 {
        self.last_completed_sector_time_sec
    }

    pub fn last_completed_sector_number(&self) -> usize {
        self.last_completed_sector_number
    }

    pub fn current_lap_sector_time(&self, sector: usize) -> f64 {
        Self::tier_cell(&self.current_lap_sec, sector)
    }

    pub fn last_lap_sector_time(&self, sector: usize) -> f64 {
        Self::tier_cell(&self.last_lap_sec, sector)
    }

    pub fn session_best_sector_time(&self, sector: usize) -> f64 {
        Self::tier_cell(&self.session_best_sec, sector)
    }

    pub fn all_time_best_sector_time(&self, sector: usize) -> f64 {
        Self::tier_cell(&self.all_time_best_sec, sector)
    }

    fn tier_cell(tier: &[f64; MAX_SECTORS + 1], sector: usize) -> f64 {
        if (1..=MAX_SECTORS).contains(&sector) {
            tier[sector]
        } else {
            UNSET_TIME
        }
    }

    // ------------------------------------------------------------------
    // Main entry points
    // ------------------------------------------------------------------

    /// Clear all display fields and timing tiers, including session and
    /// cached all-time bests. The durable store is untouched. Called by
    /// the host when telemetry reports no active session.
    pub fn reset(&mut self) {
        self.current_turn.clear();
        self.current_sector_number = 0;
        self.sector_count = 0;
        self.track_id.clear();
        self.position_pct = 0.0;
        self.reset_timing_state();
    }

    /// Process one telemetry tick under the given ambient conditions.
    pub fn update(&mut self, sample: &TelemetrySample, conditions: &TrackConditions) {
        // Track ids can appear late in a session; identity only switches
        // on a non-blank incoming id.
        let track_changed = !self.track_id.eq_ignore_ascii_case(&sample.track_id);
        let car_changed = !self.car_model.eq_ignore_ascii_case(&conditions.car_model);

        if (track_changed || car_changed) && !sample.track_id.trim().is_empty() {
            info!(
                "Timing identity changed to ({}, {}), resetting tiers",
                sample.track_id, conditions.car_model
            );
            self.reset_timing_state();
            self.car_model = conditions.car_model.clone();

            if !self.car_model.trim().is_empty() {
                if let Some(store) = &self.store {
                    if let Err(e) = store.load_all_bests(
                        &sample.track_id,
                        &self.car_model,
                        &mut self.all_time_best_sec,
                    ) {
                        warn!(
                            "Could not load all-time bests for ({}, {}): {}",
                            sample.track_id, self.car_model, e
                        );
                    }
                }
            }
        } else {
            self.car_model = conditions.car_model.clone();
        }

        self.track_id = sample.track_id.clone();
        self.position_pct = sample.position_pct;

        self.current_turn = turn_label(self.segments.as_ref(), &self.track_id, sample.position_pct)
            .unwrap_or_default()
            .to_string();
        let lookup = sector_of(self.segments.as_ref(), &self.track_id, sample.position_pct);
        self.sector_count = lookup.count;
        self.current_sector_number = lookup.number;

        // Unmapped samples must never pollute timing; remember the raw
        // values for next-tick comparisons and stop.
        if lookup.number == 0 {
            self.prev_position_pct = sample.position_pct;
            self.prev_lap_time_sec = sample.lap_time_sec;
            return;
        }

        // A backward jump in the lap clock is the only wrap signal.
        // Position heuristics would double-fire on the same lap.
        let lap_wrapped =
            sample.lap_time_sec < self.prev_lap_time_sec - LAP_TIME_RESET_TOLERANCE_SEC;

        if lap_wrapped {
            if (1..=MAX_SECTORS).contains(&self.prev_sector_number) {
                // The wrap only fires on a clock reset, so the previous
                // frame's clock is the lap's final reading.
                let final_sector_time = self.prev_lap_time_sec - self.sector_start_lap_time_sec;
                if final_sector_time >= MIN_SECTOR_TIME_SEC {
                    self.record_completed_sector(
                        self.prev_sector_number,
                        final_sector_time,
                        sample.lap_valid,
                        conditions,
                    );
                }
            }

            self.finalize_lap();
            self.sector_start_lap_time_sec = sample.lap_time_sec;
            self.current_sector_time_sec = sample.lap_time_sec - self.sector_start_lap_time_sec;
            self.prev_position_pct = sample.position_pct;
            self.prev_lap_time_sec = sample.lap_time_sec;
            // prev sector stays cleared; the next sample re-establishes
            // it through the ratchet below.
            return;
        }

        // Forward transitions only; a lower or equal sector mid-lap is
        // position noise. The upper bound keeps a table with more ranges
        // than the tier arrays hold from indexing past them.
        if (1..=MAX_SECTORS).contains(&self.prev_sector_number)
            && lookup.number > self.prev_sector_number
        {
            let completed_sector_time = sample.lap_time_sec - self.sector_start_lap_time_sec;
            if completed_sector_time >= MIN_SECTOR_TIME_SEC {
                self.record_completed_sector(
                    self.prev_sector_number,
                    completed_sector_time,
                    sample.lap_valid,
                    conditions,
                );
            }
            // The clock marker advances at every forward boundary, even
            // when the finished segment was discarded as noise.
            self.sector_start_lap_time_sec = sample.lap_time_sec;
        }

        self.current_sector_time_sec = sample.lap_time_sec - self.sector_start_lap_time_sec;

        self.prev_position_pct = sample.position_pct;
        self.prev_lap_time_sec = sample.lap_time_sec;

        // One-way ratchet: a backward glitch must not move the reference
        // point used by later genuine forward transitions.
        if self.prev_sector_number == 0 || lookup.number >= self.prev_sector_number {
            if self.prev_sector_number == 0 {
                self.sector_start_lap_time_sec = sample.lap_time_sec;
                self.current_sector_time_sec = 0.0;
            }
            self.prev_sector_number = lookup.number;
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Record a completed sector into the current lap tier and promote
    /// it through the session and all-time tiers, persisting an all-time
    /// improvement when a store is configured.
    fn record_completed_sector(
        &mut self,
        sector: usize,
        time_sec: f64,
        lap_valid: bool,
        conditions: &TrackConditions,
    ) {
        self.current_lap_sec[sector] = time_sec;

        if should_update_session_best(time_sec, self.session_best_sec[sector], lap_valid) {
            self.session_best_sec[sector] = time_sec;

            let beats_all_time = self.all_time_best_sec[sector] < 0.0
                || time_sec < self.all_time_best_sec[sector];
            if beats_all_time {
                self.all_time_best_sec[sector] = time_sec;

                if !self.car_model.trim().is_empty() {
                    if let Some(store) = &self.store {
                        if let Err(e) = store.save_best(
                            &self.track_id,
                            sector,
                            time_sec,
                            &self.car_model,
                            conditions,
                        ) {
                            warn!(
                                "Could not persist sector best ({}, {}, {}): {}",
                                self.track_id, sector, self.car_model, e
                            );
                        }
                    }
                }
            }
        }

        self.last_completed_sector_time_sec = time_sec;
        self.last_completed_sector_number = sector;
    }

    /// Close out the lap: the current lap tier becomes the last lap and
    /// is cleared, and the previous-sector marker is dropped so the next
    /// sample re-establishes it fresh. The last-completed display fields
    /// keep the value just recorded.
    fn finalize_lap(&mut self) {
        self.last_lap_sec = self.current_lap_sec;
        self.current_lap_sec.fill(UNSET_TIME);
        self.prev_sector_number = 0;
    }

    fn reset_timing_state(&mut self) {
        self.current_sector_time_sec = UNSET_TIME;
        self.last_completed_sector_time_sec = UNSET_TIME;
        self.last_completed_sector_number = 0;
        self.prev_sector_number = 0;
        self.prev_position_pct = 0.0;
        self.prev_lap_time_sec = 0.0;
        self.sector_start_lap_time_sec = 0.0;

        self.current_lap_sec.fill(UNSET_TIME);
        self.last_lap_sec.fill(UNSET_TIME);
        self.session_best_sec.fill(UNSET_TIME);
        // repopulated from the store on the next identity change
        self.all_time_best_sec.fill(UNSET_TIME);
    }
}
