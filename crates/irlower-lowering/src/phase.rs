//! Lowering phases and the per-file driver.
//!
//! A [`LoweringPhase`] transforms one [`IrFile`] at a time and declares which
//! phases must have run before it. [`PhasePipeline`] runs phases in the order
//! they were added and refuses to run a phase whose prerequisites have not
//! completed (or been skipped as disabled).

use std::fmt;
use std::ops::AddAssign;

use irlower_core::{IrFile, IrModule, LoweringError, Result, StubFactory};
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::options::{LoweringOptions, TargetPlatform};
use crate::static_default::StaticDefaultFunctionLowering;

/// Counters reported by a phase run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoweringStats {
    /// Static stubs created.
    pub stubs_created: usize,
    /// Dispatcher declarations replaced by their stub.
    pub declarations_replaced: usize,
    /// Calls retargeted at a stub.
    pub calls_rewritten: usize,
    /// Returns retargeted at a stub.
    pub returns_retargeted: usize,
}

impl LoweringStats {
    /// Whether the run changed nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for LoweringStats {
    fn add_assign(&mut self, other: Self) {
        self.stubs_created += other.stubs_created;
        self.declarations_replaced += other.declarations_replaced;
        self.calls_rewritten += other.calls_rewritten;
        self.returns_retargeted += other.returns_retargeted;
    }
}

impl fmt::Display for LoweringStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stubs, {} declarations, {} calls, {} returns",
            self.stubs_created,
            self.declarations_replaced,
            self.calls_rewritten,
            self.returns_retargeted
        )
    }
}

/// A lowering phase over one file.
pub trait LoweringPhase {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Phases that must have completed before this one runs.
    fn prerequisites(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the phase applies to this target under these options.
    fn is_enabled(&self, _options: &LoweringOptions, _platform: &dyn TargetPlatform) -> bool {
        true
    }

    fn run(&self, module: &mut IrModule, file: &IrFile) -> Result<LoweringStats>;
}

/// Makes default-argument adapters static.
///
/// Every top-level container of the file is lowered by its own
/// [`StaticDefaultFunctionLowering`], so stubs are never shared across
/// containers.
pub struct StaticDefaultFunctionPhase<'f> {
    factory: &'f dyn StubFactory,
}

impl<'f> StaticDefaultFunctionPhase<'f> {
    pub const NAME: &'static str = "StaticDefaultFunction";

    pub fn new(factory: &'f dyn StubFactory) -> Self {
        Self { factory }
    }
}

impl LoweringPhase for StaticDefaultFunctionPhase<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Make function adapters for default arguments static"
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["StaticAnnotation"]
    }

    fn is_enabled(&self, options: &LoweringOptions, platform: &dyn TargetPlatform) -> bool {
        options.static_default_stubs.resolve(platform)
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn run(&self, module: &mut IrModule, file: &IrFile) -> Result<LoweringStats> {
        let mut stats = LoweringStats::default();
        for &container in &file.containers {
            stats += StaticDefaultFunctionLowering::new(module, self.factory).lower(container)?;
        }
        Ok(stats)
    }
}

/// Outcome of one phase in a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRun {
    pub phase: &'static str,
    /// `None` when the phase was disabled for this target.
    pub stats: Option<LoweringStats>,
}

/// Outcome of running a pipeline over one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub runs: Vec<PhaseRun>,
}

impl PipelineReport {
    /// Stats of the named phase, if it ran.
    pub fn stats(&self, phase: &str) -> Option<LoweringStats> {
        self.runs
            .iter()
            .find(|run| run.phase == phase)
            .and_then(|run| run.stats)
    }

    /// Whether the named phase was skipped as disabled.
    pub fn skipped(&self, phase: &str) -> bool {
        self.runs
            .iter()
            .any(|run| run.phase == phase && run.stats.is_none())
    }
}

/// Ordered list of phases run over each file.
pub struct PhasePipeline<'p> {
    phases: Vec<Box<dyn LoweringPhase + 'p>>,
    options: LoweringOptions,
    platform: &'p dyn TargetPlatform,
}

impl<'p> PhasePipeline<'p> {
    pub fn new(options: LoweringOptions, platform: &'p dyn TargetPlatform) -> Self {
        Self {
            phases: Vec::new(),
            options,
            platform,
        }
    }

    pub fn with_phase(mut self, phase: impl LoweringPhase + 'p) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Names of the scheduled phases, in run order.
    pub fn phase_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.phases.iter().map(|phase| phase.name())
    }

    /// Run every phase over `file`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run_file(&self, module: &mut IrModule, file: &IrFile) -> Result<PipelineReport> {
        let mut completed: FxHashSet<&'static str> = FxHashSet::default();
        let mut report = PipelineReport::default();

        for phase in &self.phases {
            if let Some(missing) = phase
                .prerequisites()
                .iter()
                .find(|prerequisite| !completed.contains(*prerequisite))
            {
                return Err(LoweringError::MissingPrerequisite {
                    phase: phase.name(),
                    prerequisite: *missing,
                });
            }

            let stats = if phase.is_enabled(&self.options, self.platform) {
                let stats = phase.run(module, file)?;
                info!(
                    phase = phase.name(),
                    file = %file.name,
                    target = self.platform.name(),
                    %stats,
                    "phase complete"
                );
                Some(stats)
            } else {
                debug!(phase = phase.name(), target = self.platform.name(), "phase disabled");
                None
            };

            completed.insert(phase.name());
            report.runs.push(PhaseRun {
                phase: phase.name(),
                stats,
            });
        }

        Ok(report)
    }
}
