use crate::core_ftpcommand::handlers::Outcome;
use crate::core_ftpcommand::reply::Reply;

/// Features advertised in the FEAT reply.
const FEATURES: [&str; 2] = ["PASV", "UTF8"];

/// Handles the FEAT (Feature) FTP command.
///
/// This function responds with the list of supported features, one per line,
/// each indented by a single space.
pub fn handle_feat_command() -> Outcome {
    let mut lines = vec!["Features:".to_string()];
    lines.extend(FEATURES.iter().map(|feature| format!(" {}", feature)));
    lines.push("End".to_string());

    Outcome::Reply(Reply::multiline(211, lines))
}
