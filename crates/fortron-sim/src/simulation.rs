//! Tick-driven capacitor simulation with event recording.

use std::collections::BTreeMap;
use std::sync::Arc;

use fortron_core::{Balancer, FortronStorage, TransferMode};
use fortron_grid::{Frequency, FrequencyGrid};
use tracing::{debug, info};

use crate::capacitor::{Capacitor, CapacitorId};
use crate::config::{CapacitorSpec, ChurnAction, ChurnEvent, SimulationConfig};
use crate::error::{Error, Result};
use crate::events::{GridEvent, GridSnapshot};
use crate::recorder::BeamRecorder;

/// Simulates a fortron grid and records events.
///
/// The simulation owns every placed capacitor; its [`FrequencyGrid`] only
/// holds weak handles. Breaking a capacitor drops the last strong handle,
/// which is exactly what a host world does when a block is destroyed.
pub struct Simulation {
    ticks: u64,
    churn: Vec<ChurnEvent>,
    churn_cursor: usize,
    grid: FrequencyGrid<Capacitor>,
    capacitors: BTreeMap<CapacitorId, Arc<Capacitor>>,
    recorder: BeamRecorder,
    events: Vec<GridEvent>,
    next_id: u64,
    current_tick: u64,
}

impl Simulation {
    /// Validate `config` and place its initial capacitors.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let SimulationConfig {
            ticks,
            capacitors,
            mut churn,
        } = config;
        churn.sort_by_key(|event| event.tick);

        let mut sim = Self {
            ticks,
            churn,
            churn_cursor: 0,
            grid: FrequencyGrid::new(),
            capacitors: BTreeMap::new(),
            recorder: BeamRecorder::new(),
            events: Vec::new(),
            next_id: 0,
            current_tick: 0,
        };

        for spec in &capacitors {
            sim.place(spec)?;
        }
        Ok(sim)
    }

    /// Place a capacitor and register it with the grid.
    pub fn place(&mut self, spec: &CapacitorSpec) -> Result<CapacitorId> {
        spec.validate()?;

        let id = CapacitorId(self.next_id);
        self.next_id += 1;

        let capacitor = Arc::new(Capacitor::new(id, spec));
        self.grid.register(&capacitor);
        self.capacitors.insert(id, capacitor);

        self.events.push(GridEvent::CapacitorPlaced {
            id,
            position: spec.position,
            frequency: spec.frequency,
            tick: self.current_tick,
        });
        debug!(%id, frequency = %spec.frequency, "capacitor placed");
        Ok(id)
    }

    /// Break a capacitor. Its stored energy is lost with it.
    pub fn break_capacitor(&mut self, id: CapacitorId) -> Result<()> {
        let capacitor = self
            .capacitors
            .remove(&id)
            .ok_or(Error::UnknownCapacitor(id))?;

        capacitor.invalidate();
        self.grid.unregister(&capacitor);

        let energy = capacitor.fortron_energy();
        self.events.push(GridEvent::CapacitorBroken {
            id,
            energy,
            tick: self.current_tick,
        });
        debug!(%id, energy, "capacitor broken");
        Ok(())
    }

    /// Tune a capacitor to another frequency.
    pub fn retune(&mut self, id: CapacitorId, frequency: Frequency) -> Result<()> {
        self.capacitor(id)?.set_frequency(frequency);
        self.events.push(GridEvent::Retuned {
            id,
            frequency,
            tick: self.current_tick,
        });
        Ok(())
    }

    /// Switch a capacitor's balancing mode.
    pub fn set_mode(&mut self, id: CapacitorId, mode: TransferMode) -> Result<()> {
        self.capacitor(id)?.set_mode(mode);
        self.events.push(GridEvent::ModeChanged {
            id,
            mode,
            tick: self.current_tick,
        });
        Ok(())
    }

    /// Advance one tick: apply due churn, then let every capacitor balance
    /// with its linked group, in id order.
    pub fn step(&mut self) -> Result<()> {
        self.apply_churn()?;

        let tick = self.current_tick;
        let balancer = Balancer::new(&self.recorder);

        for capacitor in self.capacitors.values() {
            let group = self.grid.linked(capacitor, capacitor.range());
            balancer.distribute(
                &**capacitor,
                &group,
                capacitor.mode(),
                capacitor.transfer_limit(),
            );

            let source = capacitor.id();
            self.events.extend(
                self.recorder
                    .take()
                    .into_iter()
                    .map(|beam| GridEvent::Beam { source, beam, tick }),
            );
        }

        self.grid.clean_up();
        self.events.push(GridEvent::TickCompleted {
            total_energy: self.total_energy(),
            tick,
        });
        self.current_tick += 1;
        Ok(())
    }

    /// Run until the configured tick count is reached.
    pub fn run(&mut self) -> Result<()> {
        let start_energy = self.total_energy();
        while self.current_tick < self.ticks {
            self.step()?;
        }

        info!(
            ticks = self.current_tick,
            capacitors = self.capacitors.len(),
            events = self.events.len(),
            start_energy,
            end_energy = self.total_energy(),
            "simulation complete"
        );
        Ok(())
    }

    /// Step `n` ticks, ignoring the configured tick count.
    pub fn run_ticks(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    fn apply_churn(&mut self) -> Result<()> {
        while let Some(event) = self.churn.get(self.churn_cursor) {
            if event.tick > self.current_tick {
                break;
            }
            let action = event.action.clone();
            self.churn_cursor += 1;

            match action {
                ChurnAction::Place { capacitor } => {
                    self.place(&capacitor)?;
                }
                ChurnAction::Break { id } => self.break_capacitor(id)?,
                ChurnAction::Retune { id, frequency } => self.retune(id, frequency)?,
                ChurnAction::SetMode { id, mode } => self.set_mode(id, mode)?,
            }
        }
        Ok(())
    }

    fn capacitor(&self, id: CapacitorId) -> Result<&Arc<Capacitor>> {
        self.capacitors.get(&id).ok_or(Error::UnknownCapacitor(id))
    }

    /// A placed capacitor, if it still exists.
    pub fn get(&self, id: CapacitorId) -> Option<&Arc<Capacitor>> {
        self.capacitors.get(&id)
    }

    /// The frequency registry.
    pub fn grid(&self) -> &FrequencyGrid<Capacitor> {
        &self.grid
    }

    /// Energy stored across every placed capacitor.
    pub fn total_energy(&self) -> i64 {
        self.capacitors.values().map(|c| c.fortron_energy()).sum()
    }

    /// Capacity across every placed capacitor.
    pub fn total_capacity(&self) -> i64 {
        self.capacitors.values().map(|c| c.fortron_capacity()).sum()
    }

    /// Get all recorded events.
    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Number of ticks completed so far.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Get the number of placed capacitors.
    pub fn capacitor_count(&self) -> usize {
        self.capacitors.len()
    }

    /// Get a snapshot of the grid at the current state.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            tick: self.current_tick,
            capacitors: self.capacitors.values().map(|c| c.state()).collect(),
            total_energy: self.total_energy(),
            total_capacity: self.total_capacity(),
        }
    }
}
