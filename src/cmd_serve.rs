//! `serve-stdio`: newline-delimited JSON requests on stdin, responses on
//! stdout.

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use personafill_core::FillEngine;
use personafill_protocols::{FillRequest, FillResponse, FormPage};

/// Serve requests one at a time until stdin closes.
pub(crate) async fn serve_stdio(engine: &FillEngine, page: &dyn FormPage) -> anyhow::Result<()> {
    info!("Serving requests on stdio");
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(engine, page, stdin, stdout).await
}

/// Request loop over any line reader and writer.
pub(crate) async fn serve<R, W>(
    engine: &FillEngine,
    page: &dyn FormPage,
    reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<FillRequest>(line) {
            Ok(request) => engine.handle(page, request).await,
            Err(e) => {
                warn!("Invalid request: {}", e);
                FillResponse::error(format!("Invalid request: {}", e))
            }
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
    info!("Input closed, stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use personafill_config::Config;
    use personafill_core::MemoryPage;
    use personafill_protocols::{PageSnapshot, SnapshotNode};

    use super::*;

    #[tokio::test]
    async fn test_serve_answers_each_line() {
        let mut b = PageSnapshot::builder("https://example.com");
        b.push(b.body(), SnapshotNode::element("input").with_attr("name", "email"));
        let page = MemoryPage::new(b.build());
        let engine = FillEngine::new(&Config::default()).unwrap();

        let input = concat!(
            "{\"action\": \"ping\"}\n",
            "\n",
            "{\"action\": \"fillForm\", \"profile\": {\"name\": \"p\", \"email\": \"a@b.com\"}}\n",
            "{\"action\": \"explode\"}\n",
        );
        let mut output = Vec::new();
        serve(&engine, &page, input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["message"], "Form filler is ready");
        assert_eq!(responses[1]["filledCount"], 1);
        assert_eq!(responses[2]["success"], false);
    }
}
