//! # Appointment Reconciler
//!
//! Holds the appointments currently shown on the dashboard and the one open in
//! the detail panel. Snapshots from the backend replace the collection; live
//! updates are upserted by id, keeping position.
//!
//! Live updates are applied in arrival order. When both the held copy and the
//! incoming one carry `updated_at`, an incoming copy strictly older than the
//! held one is dropped.

use crate::models::appointment::Appointment;

/// What a live update did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveUpdateOutcome {
    Inserted,
    Replaced { index: usize },
    /// Older than the copy already held.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
    selected: Option<Appointment>,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// The appointment open in the detail panel.
    pub fn selected(&self) -> Option<&Appointment> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, appointment: Appointment) {
        self.selected = Some(appointment);
    }

    /// Opens the held appointment with `id`; returns false if it is not loaded.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.get(id).cloned() {
            Some(appointment) => {
                self.selected = Some(appointment);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replaces the whole collection with a freshly loaded page.
    ///
    /// Duplicate ids in the page keep the position of their first occurrence
    /// and the payload of their last. If the selected appointment is in the
    /// page it is refreshed from it.
    pub fn apply_server_snapshot(&mut self, snapshot: Vec<Appointment>) {
        let mut appointments: Vec<Appointment> = Vec::with_capacity(snapshot.len());
        for appointment in snapshot {
            match appointments.iter_mut().find(|held| held.id == appointment.id) {
                Some(held) => *held = appointment,
                None => appointments.push(appointment),
            }
        }
        self.appointments = appointments;

        if let Some(selected) = &self.selected {
            if let Some(fresh) = self.get(&selected.id).cloned() {
                self.selected = Some(fresh);
            }
        }
    }

    /// Upserts one pushed appointment by id.
    pub fn apply_live_update(&mut self, appointment: Appointment) -> LiveUpdateOutcome {
        let position = self
            .appointments
            .iter()
            .position(|held| held.id == appointment.id);

        let outcome = match position {
            Some(index) => {
                if is_older(&appointment, &self.appointments[index]) {
                    return LiveUpdateOutcome::Stale;
                }
                self.appointments[index] = appointment.clone();
                LiveUpdateOutcome::Replaced { index }
            }
            None => {
                if let Some(selected) = &self.selected {
                    if selected.id == appointment.id && is_older(&appointment, selected) {
                        return LiveUpdateOutcome::Stale;
                    }
                }
                self.appointments.push(appointment.clone());
                LiveUpdateOutcome::Inserted
            }
        };

        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id == appointment.id)
        {
            self.selected = Some(appointment);
        }

        outcome
    }
}

fn is_older(incoming: &Appointment, held: &Appointment) -> bool {
    match (incoming.updated_at, held.updated_at) {
        (Some(incoming), Some(held)) => incoming < held,
        _ => false,
    }
}
