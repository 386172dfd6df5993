//! Transform a photo into the Ghibli style.
//!
//! Usage: cargo run --example ghiblify_photo -- photo.jpg
//! Requires GOOGLE_API_KEY.

use ghiblify::{GeminiTransformer, Session, UploadedFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "photo.jpg".to_string());

    let transformer = GeminiTransformer::builder().build()?;
    let mut session = Session::new();

    session.upload(UploadedFile::from_path(&input).await?);
    println!("Transforming {input}...");

    session.generate(&transformer).await;

    match session.result() {
        Some(image) => {
            image.save("ghibli-image.jpg")?;
            println!("Saved ghibli-image.jpg ({} bytes)", image.size());
        }
        None => println!("{}", session.message().unwrap_or("no result")),
    }

    Ok(())
}
