use crate::core_ftpcommand::handlers::Outcome;

pub fn handle_noop_command() -> Outcome {
    Outcome::reply(200, "NOOP ok.")
}
