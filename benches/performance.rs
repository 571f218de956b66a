use jot_tui::{
    document::{Block, Document, List, ListItem, ListPath, Paragraph},
    editor::{Command, DocumentEditor},
    interchange::{self, DocumentFormat},
    render::{self, RenderOptions},
    theme::Theme,
};
use std::time::{Duration, Instant};

/// Performance benchmark suite for jot editor operations
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Outline rendering performance
/// - Structural list commands on large outlines
/// - Typing sessions that create and leave lists
/// - Markdown export
const SMALL_OUTLINE_ITEMS: usize = 10;
const MEDIUM_OUTLINE_ITEMS: usize = 100;
const LARGE_OUTLINE_ITEMS: usize = 1000;
const HUGE_OUTLINE_ITEMS: usize = 10000;

const ITERATIONS: usize = 100;

const SAMPLE_WORDS: [&str; 12] = [
    "Lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
];

fn sample_text(seed: usize, words: usize) -> String {
    let mut text = String::new();
    for j in 0..words {
        if j > 0 {
            text.push(' ');
        }
        text.push_str(SAMPLE_WORDS[(seed + j) % SAMPLE_WORDS.len()]);
    }
    text
}

/// Create a journal with `num_items` root items, every third one carrying a
/// nested sublist of the given depth.
fn create_test_outline(num_items: usize, depth: usize) -> Document {
    let mut items = Vec::with_capacity(num_items);
    for i in 0..num_items {
        let mut item = ListItem::new(sample_text(i, 12));
        if i % 3 == 0 {
            let mut nested = ListItem::new(sample_text(i + 1, 8));
            for level in 1..depth {
                nested = ListItem::new(sample_text(i + level, 8))
                    .with_sublist(List::with_items(vec![nested]));
            }
            item = item.with_sublist(List::with_items(vec![nested]));
        }
        items.push(item);
    }
    Document::new().with_blocks(vec![
        Block::Paragraph(Paragraph::new("Journal")),
        Block::List(List::with_items(items)),
        Block::Paragraph(Paragraph::new("End of journal")),
    ])
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);
        println!(
            "Ops/sec:        {:.2}",
            1_000_000.0 / self.avg_duration.as_micros().max(1) as f64
        );

        if self.avg_duration.as_millis() > 100 {
            println!("\n⚠️  WARNING: Average duration > 100ms (user-perceptible lag)");
        } else if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (may drop frames)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..10 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = *durations.iter().min().unwrap();
    let max_duration = *durations.iter().max().unwrap();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

fn outline_sizes() -> Vec<(&'static str, usize)> {
    vec![
        ("Small (10 items)", SMALL_OUTLINE_ITEMS),
        ("Medium (100 items)", MEDIUM_OUTLINE_ITEMS),
        ("Large (1000 items)", LARGE_OUTLINE_ITEMS),
        ("Huge (10000 items)", HUGE_OUTLINE_ITEMS),
    ]
}

#[test]
fn bench_rendering_performance() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           OUTLINE RENDERING BENCHMARKS                         ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let options = RenderOptions::default();
    let theme = Theme::default();
    for (name, size) in outline_sizes() {
        let doc = create_test_outline(size, 3);
        let iterations = if name.contains("Huge") { 10 } else { ITERATIONS };
        let result = benchmark(&format!("render_document - {}", name), iterations, || {
            let _ = render::render_document(&doc, None, 80, &options, &theme);
        });
        result.print();
    }
}

#[test]
fn bench_wrap_width_impact() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              WRAP WIDTH IMPACT BENCHMARKS                      ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let doc = create_test_outline(MEDIUM_OUTLINE_ITEMS, 4);
    let options = RenderOptions::default();
    let theme = Theme::default();

    for width in [40, 80, 120, 200] {
        let result = benchmark(
            &format!("render_document - wrap_width={}", width),
            ITERATIONS,
            || {
                let _ = render::render_document(&doc, None, width, &options, &theme);
            },
        );
        result.print();
    }
}

#[test]
fn bench_indent_unindent_cycle() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              INDENT / UNINDENT BENCHMARKS                      ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!("\nEach iteration indents the middle item three levels deep and");
    println!("unindents it back, running the cleanup pass every time.");

    for (name, size) in outline_sizes() {
        let doc = create_test_outline(size, 2);
        let target = ListPath::root(1).item(size / 2);
        let node = doc.item(&target).map(ListItem::id).unwrap();
        let mut editor = DocumentEditor::new(doc);
        assert!(editor.move_to(node, 0));

        let iterations = if name.contains("Huge") { 10 } else { ITERATIONS };
        let result = benchmark(&format!("Indent cycle - {}", name), iterations, || {
            for _ in 0..3 {
                editor.apply(Command::Indent);
            }
            for _ in 0..3 {
                editor.apply(Command::Unindent);
            }
        });
        result.print();

        let per_command = result.avg_duration / 6;
        println!("\nPer-command cost: {:?}", per_command);
    }
}

#[test]
fn bench_outline_typing_session() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              OUTLINE TYPING SESSION BENCHMARKS                 ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!("\nThis simulates a full journaling burst at the end of a document:");
    println!("  1. Type the list trigger and convert the paragraph");
    println!("  2. Enter five items, indenting every other one");
    println!("  3. Leave the list with Enter on empty items");

    for (name, size) in outline_sizes() {
        let iterations = if name.contains("Huge") { 10 } else { ITERATIONS };
        let result = benchmark(&format!("Typing session - {}", name), iterations, || {
            let mut editor = DocumentEditor::new(create_test_outline(size, 2));
            let last = editor.document().blocks.len() - 1;
            let node = editor.document().paragraph(last).map(Paragraph::id).unwrap();
            editor.move_to(node, usize::MAX);
            editor.apply(Command::ExitOrNewline);
            editor.insert_text("/-");
            editor.apply(Command::ConvertTrigger);
            for i in 0..5 {
                editor.insert_text("entry");
                if i % 2 == 1 {
                    editor.apply(Command::Indent);
                }
                editor.apply(Command::ExitOrNewline);
            }
            while editor.cursor_breadcrumbs() != Some(vec!["Paragraph".to_string()]) {
                editor.apply(Command::ExitOrNewline);
            }
        });
        result.print();
    }
}

#[test]
fn bench_markdown_export() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              MARKDOWN EXPORT BENCHMARKS                        ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    for (name, size) in outline_sizes() {
        let doc = create_test_outline(size, 3);
        let iterations = if name.contains("Huge") { 10 } else { ITERATIONS };
        let result = benchmark(&format!("write_document - {}", name), iterations, || {
            let _ = interchange::write_document(&doc, DocumentFormat::Markdown).unwrap();
        });
        result.print();
    }
}
