#![no_main]
use libfuzzer_sys::fuzz_target;
use texeq_extract::extract;

fuzz_target!(|data: &[u8]| {
    // Extraction is total: any text must produce records, never a panic.
    let s = String::from_utf8_lossy(data);
    let extraction = extract(&s);
    for record in &extraction.records {
        let _ = extraction.locate(record.number.as_deref().unwrap_or(""));
    }
});
