use crate::quantity::Quantity;

/// Ground truth of a constant-velocity needle insertion
///
/// Force grows quadratically with depth until the membrane punctures, drops to
/// the cutting force, then grows linearly with shaft friction.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct InsertionProfile {
    /// Insertion velocity in mm/s
    pub velocity: f32,
    /// Needle spin in deg/s
    pub rotation_rate: f32,
    /// Depth of the membrane puncture in mm
    pub puncture_depth: f32,
    /// Pre-puncture stiffness in N/mm^2
    pub stiffness: f32,
    /// Force right after puncture in N
    pub cutting_force: f32,
    /// Shaft friction in N/mm
    pub friction: f32,
}

impl Default for InsertionProfile {
    fn default() -> Self {
        Self {
            velocity: 5.0,
            rotation_rate: 0.0,
            puncture_depth: 12.0,
            stiffness: 0.01,
            cutting_force: 0.8,
            friction: 0.05,
        }
    }
}

impl InsertionProfile {
    pub fn displacement(&self, t: f32) -> f32 {
        self.velocity * t
    }

    pub fn rotation(&self, t: f32) -> f32 {
        self.rotation_rate * t
    }

    pub fn force(&self, t: f32) -> f32 {
        let depth = self.displacement(t);
        if depth < self.puncture_depth {
            self.stiffness * depth * depth
        } else {
            self.cutting_force + self.friction * (depth - self.puncture_depth)
        }
    }

    /// True value of `quantity` at time `t`
    pub fn value(&self, quantity: Quantity, t: f32) -> f32 {
        match quantity {
            Quantity::Time => t,
            Quantity::DisplacementX => self.displacement(t),
            Quantity::VelocityX => self.velocity,
            Quantity::RotationX => self.rotation(t),
            Quantity::ForceX => self.force(t),
        }
    }
}
