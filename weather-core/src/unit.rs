use crate::model::Unit;

/// Session-wide display unit. Starts at Celsius; only `toggle` changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitContext {
    unit: Unit,
}

impl UnitContext {
    pub fn new(unit: Unit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Flip the unit and return the new one.
    pub fn toggle(&mut self) -> Unit {
        self.unit = self.unit.opposite();
        self.unit
    }
}
