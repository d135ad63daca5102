use super::Xorshift32;

/// Generates unique filesystem paths for Unix-family socket tests.
#[derive(Copy, Clone, Debug)]
pub struct NameGen {
    rng: Xorshift32,
}
impl NameGen {
    pub fn new(id: &'static str) -> Self {
        Self { rng: Xorshift32::from_id(id) }
    }
    fn next_path(&mut self) -> String {
        format!("/tmp/polysock-test-{:08x}.sock", self.rng.next())
    }
}
impl Iterator for NameGen {
    type Item = String;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_path())
    }
}

macro_rules! make_id {
    () => {
        concat!(file!(), line!(), column!())
    };
}
