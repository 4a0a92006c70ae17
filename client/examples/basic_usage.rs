use std::process::exit;

use opensubtitles_client::http::{Client, ClientConfig};
use opensubtitles_client::query::SearchQuery;
use opensubtitles_client::Result;

fn main() -> Result<()> {
    // Expect the OpenSubtitles credentials as the first two arguments,
    // optionally followed by an IMDb id
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <username> <password> [imdb_id]", args[0]);
        exit(1);
    }

    let mut client = Client::create(
        ClientConfig::new().credentials(args[1].clone(), args[2].clone()),
    )?;

    // Server status, no session needed
    let info = client.server_info()?;
    println!("Server status: {:?}", info.status());

    // Search by IMDb id; the first session call logs in transparently
    let imdb_id = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| "0133093".to_string());
    println!("Searching subtitles for IMDb id {}", imdb_id);

    let query = SearchQuery::new().imdb_id(imdb_id).language("eng");
    let results = client.search_subtitles(vec![query])?;

    let data = results.data().unwrap_or(&[]);
    println!("Found {} subtitles", data.len());
    for entry in data {
        if let Some(members) = entry.as_struct() {
            let name = members
                .get("SubFileName")
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            let id = members
                .get("IDSubtitleFile")
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            println!("- {} (file id {})", name, id);
        }
    }

    // End the session explicitly; dropping the client would also log out
    // best-effort
    client.log_out()?;

    Ok(())
}
