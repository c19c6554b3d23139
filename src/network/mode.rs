use rand::RngCore;

/// Selects how a forward pass behaves.
///
/// Dropout is the only mode-dependent part of the network. `Train` carries
/// the RNG that samples dropout masks; `Eval` needs none and makes the
/// forward pass a pure function of the parameters.
pub enum Mode<'a> {
    Train(&'a mut dyn RngCore),
    Eval,
}

impl Mode<'_> {
    /// Short-lived copy of this mode so it can be handed to each layer in turn.
    pub fn reborrow(&mut self) -> Mode<'_> {
        match self {
            Mode::Train(rng) => Mode::Train(&mut **rng),
            Mode::Eval => Mode::Eval,
        }
    }
}

impl std::fmt::Debug for Mode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Train(_) => f.write_str("Train"),
            Mode::Eval => f.write_str("Eval"),
        }
    }
}
