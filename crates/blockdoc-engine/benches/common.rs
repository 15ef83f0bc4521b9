// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_text(lines: usize) -> String {
    let base = [
        "Title of the document",
        "",
        "Paragraph with some content and a little ünïcode 🦀.",
        "Another line that is somewhat longer so blocks vary in length.",
    ];
    (0..lines)
        .map(|i| base[i % base.len()])
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(dead_code)]
pub fn generate_blocks(count: usize) -> Vec<blockdoc_engine::ContentBlock> {
    (0..count)
        .map(|i| {
            blockdoc_engine::ContentBlock::unstyled(
                format!("b{i}"),
                format!("Block number {i} with some content"),
            )
        })
        .collect()
}
