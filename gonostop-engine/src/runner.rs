use gonostop_core::{Classification, StimulusIntent, TickInput, TrialOutcome, TrialSpec, TrialType};

/// Per-trial timing parameters, resolved by the session at dequeue time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialParams {
    pub primary_window_ms: f64,
    pub post_window_ms: f64,
    pub min_valid_rt_ms: f64,
    pub stop_success_window_ms: f64,
    pub movement_threshold: f64,
    /// Secondary-signal delay; read only on inhibition trials.
    pub secondary_delay_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    PrimaryWindow,
    SecondaryArmed { deadline_ms: f64 },
    PostWindow { entered_at_ms: f64 },
    Done,
}

/// Executes one trial as a pure function of elapsed time and the two
/// host input signals. Trials never overlap; the session holds at most
/// one runner at a time.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    trial_id: usize,
    spec: TrialSpec,
    params: TrialParams,
    onset_ms: f64,
    clock_ms: f64,
    phase: Phase,
    responded: bool,
    latency_ms: Option<f64>,
    armed_ms: Option<f64>,
    verdict: Option<Classification>,
}

impl TrialRunner {
    /// Trial onset: records the onset timestamp, emits the presentation
    /// intent and opens the primary response window.
    pub fn start(
        trial_id: usize,
        spec: TrialSpec,
        params: TrialParams,
        onset_ms: f64,
        intents: &mut Vec<StimulusIntent>,
    ) -> Self {
        intents.push(StimulusIntent::Present {
            trial_type: spec.trial_type,
            stimulus_index: spec.stimulus_index,
        });
        Self {
            trial_id,
            spec,
            params,
            onset_ms,
            clock_ms: 0.0,
            phase: Phase::PrimaryWindow,
            responded: false,
            latency_ms: None,
            armed_ms: None,
            verdict: None,
        }
    }

    /// Advances the trial by one tick. Returns the finalized outcome on
    /// the tick that reaches a terminal condition, `None` otherwise.
    pub fn tick(
        &mut self,
        elapsed_ms: f64,
        input: &TickInput,
        intents: &mut Vec<StimulusIntent>,
    ) -> Option<TrialOutcome> {
        if self.phase == Phase::Done {
            return None;
        }
        self.clock_ms += elapsed_ms;

        match self.phase {
            Phase::PrimaryWindow => self.tick_primary_window(input, intents),
            Phase::SecondaryArmed { .. } => self.tick_secondary_armed(input, intents),
            Phase::PostWindow { .. } => self.tick_post_window(input, intents),
            Phase::Done => {}
        }

        if self.phase == Phase::Done {
            let classification = self.verdict.unwrap_or(Classification::Omission);
            return Some(TrialOutcome {
                trial_id: self.trial_id,
                block_index: self.spec.block_index,
                trial_type: self.spec.trial_type,
                stimulus_index: self.spec.stimulus_index,
                onset_ms: self.onset_ms,
                responded: self.responded,
                latency_ms: self.latency_ms,
                secondary_signal_ms: self.armed_ms,
                classification,
            });
        }
        None
    }

    fn tick_primary_window(&mut self, input: &TickInput, intents: &mut Vec<StimulusIntent>) {
        let now = self.clock_ms;

        // Arming is checked before the response so a response landing on
        // the same tick as the cue is judged under the armed rules.
        if self.spec.trial_type.is_inhibition() && now >= self.params.secondary_delay_ms {
            intents.push(StimulusIntent::SecondaryCue);
            self.armed_ms = Some(self.params.secondary_delay_ms);
            self.phase = Phase::SecondaryArmed {
                deadline_ms: self.params.secondary_delay_ms + self.params.stop_success_window_ms,
            };
            self.tick_secondary_armed(input, intents);
            return;
        }

        if input.responded && !self.responded {
            self.responded = true;
            match self.spec.trial_type {
                TrialType::Primary => {
                    if now < self.params.min_valid_rt_ms {
                        self.finish(Classification::Anticipation, intents);
                    } else {
                        self.latency_ms = Some(now);
                        self.finish(Classification::Correct, intents);
                    }
                    return;
                }
                TrialType::Inhibition => {
                    // Pre-cue go response on an inhibition trial, recorded
                    // for the log but not classified here.
                    if now >= self.params.min_valid_rt_ms {
                        self.latency_ms = Some(now);
                    }
                }
            }
        }

        if now >= self.params.primary_window_ms {
            match self.spec.trial_type {
                TrialType::Primary => {
                    if self.params.post_window_ms > 0.0 && !self.responded {
                        self.phase = Phase::PostWindow { entered_at_ms: now };
                    } else {
                        self.finish(Classification::Omission, intents);
                    }
                }
                TrialType::Inhibition => {
                    // Cue never armed (delay beyond the window); excluded
                    // from inhibition statistics by the aggregator.
                    self.finish(Classification::StopSuccess, intents);
                }
            }
        }
    }

    fn tick_secondary_armed(&mut self, input: &TickInput, intents: &mut Vec<StimulusIntent>) {
        let Phase::SecondaryArmed { deadline_ms } = self.phase else {
            return;
        };
        let now = self.clock_ms;

        match input.movement {
            // Movement variant: stopping means dropping below threshold
            // before the deadline.
            Some(magnitude) => {
                if magnitude <= self.params.movement_threshold {
                    self.finish(Classification::StopSuccess, intents);
                } else if now >= deadline_ms {
                    self.finish(Classification::StopFailure, intents);
                }
            }
            // Discrete variant: any response after the cue is a
            // commission; silence until the deadline is a stop.
            None => {
                if input.responded {
                    self.responded = true;
                    self.latency_ms = Some(now);
                    self.finish(Classification::StopFailure, intents);
                } else if now >= deadline_ms {
                    self.finish(Classification::StopSuccess, intents);
                }
            }
        }
    }

    fn tick_post_window(&mut self, input: &TickInput, intents: &mut Vec<StimulusIntent>) {
        let Phase::PostWindow { entered_at_ms } = self.phase else {
            return;
        };
        let now = self.clock_ms;

        if input.responded && !self.responded {
            self.responded = true;
            // Late responses still count, offset by the window length.
            self.latency_ms = Some(self.params.primary_window_ms + (now - entered_at_ms));
            self.finish(Classification::Correct, intents);
        } else if now - entered_at_ms >= self.params.post_window_ms {
            self.finish(Classification::Omission, intents);
        }
    }

    fn finish(&mut self, verdict: Classification, intents: &mut Vec<StimulusIntent>) {
        self.verdict = Some(verdict);
        self.phase = Phase::Done;
        intents.push(StimulusIntent::Clear);
    }
}
