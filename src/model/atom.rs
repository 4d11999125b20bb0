#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub id: usize,
    pub name: String,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

impl Atom {
    pub fn new(id: usize, name: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            velocity: [0.0; 3],
        }
    }

    pub fn with_velocity(mut self, velocity: [f64; 3]) -> Self {
        self.velocity = velocity;
        self
    }
}
