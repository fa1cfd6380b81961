#![allow(unused)]

use query_transcode::{QueryCodec, Values};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A form submitted from a Shift_JIS page
    let sjis = QueryCodec::new(encoding_rs::SHIFT_JIS);
    let values = sjis
        .parse("name=%8ER%93c+%91%BE%98Y&lang=ja&lang=en")
        .into_result()?;

    for (key, vals) in values.iter() {
        println!("{key}: {vals:?}");
    }

    // Re-encode for a legacy backend expecting EUC-JP
    let eucjp = QueryCodec::for_label("euc-jp").ok_or("unknown encoding")?;
    println!("{}", eucjp.encode(&values).into_result()?);

    // Unmappable characters are reported, the rest of the query survives
    let mixed = Values::new().with("ok", "日本").with("bad", "한국");
    let (query, err) = sjis.encode(&mixed).into_parts();
    println!("{query} ({})", err.map(|e| e.to_string()).unwrap_or_default());

    Ok(())
}
