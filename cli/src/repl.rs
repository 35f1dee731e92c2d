use std::io::{self, Write};

const PROMPT: &str = "fightline> ";

/// Print the prompt and read one line from stdin
pub fn readline() -> Result<String, String> {
    let mut stdout = io::stdout();
    write!(stdout, "{PROMPT}").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())?;

    let mut buffer = String::new();
    let read = io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        // EOF behaves like `exit`
        return Ok("exit".to_string());
    }
    Ok(buffer)
}
