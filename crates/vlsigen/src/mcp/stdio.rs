use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
pub async fn run_stdio(global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting vlsigen MCP server with stdio transport...");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        serve_line(line.trim(), &global, &mut stdout).await?;
    }

    log::info!("stdin closed, stopping MCP server");
    Ok(())
}

async fn serve_line<W>(line: &str, global: &crate::Global, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if line.is_empty() {
        return Ok(());
    }

    log::debug!("Received: {line}");

    let Some(response) = super::handle_message(line, global).await else {
        return Ok(());
    };
    let response_json =
        serde_json::to_string(&response).context("Failed to serialize JSON-RPC response")?;

    log::debug!("Sending: {response_json}");

    out.write_all(response_json.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_line_writes_one_response_per_request() {
        let global = crate::Global { verbose: false };
        let mut out = Vec::new();

        serve_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#, &global, &mut out)
            .await
            .unwrap();
        serve_line("", &global, &mut out).await.unwrap();
        serve_line(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            &global,
            &mut out,
        )
        .await
        .unwrap();

        let written = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1);
        let response: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(response["id"], 1);
    }
}
