pub mod player;
pub mod queue;
pub mod track;

#[cfg(test)]
pub(crate) mod testing;
