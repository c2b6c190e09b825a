use criterion::{black_box, criterion_group, criterion_main, Criterion};
use golit_scanner::{literal, tokenize_with_mode, ScanMode, TokenKind};

// Literal-heavy Go source covering each numeric radix and escape form.
const GO_SOURCE: &str = r#"
// Package consts exercises the literal grammar.
package consts

import "fmt"

const (
    Million    = 1_000_000
    Mask       = 0xFFFF_0000
    Perm       = 0o644
    Legacy     = 0755
    Flags      = 0b1010_0101
    Pi         = 3.141_592_653_589_793
    Avogadro   = 6.022_140_76e23
    Tiny       = 0x1.fffffffffffffp-1022
    Half       = 0x.8p0
    Rotation   = 1.5i
    Newline    = '\n'
    Quote      = '\''
    Max        = '\U0010FFFF'
    Bell       = '\a'
    Octal      = '\377'
    Hex        = '\xff'
    Greeting   = "Hello, 世界\t\u263A\n"
    Path       = `C:\Program Files\golit`
)

/* Multi-line comment
   spanning lines. */
func main() {
    values := []float64{.25, 1e-9, 072.40, 0x_1p-2, 1_5.}
    for i, v := range values {
        if v > 0.5 && i%2 == 0 {
            fmt.Printf("%d: %v\n", i, v)
        }
    }
    var mask uint32 = Mask &^ 0x00FF
    mask <<= 2
    ch := make(chan int, 0)
    go func() { ch <- 42 }()
    <-ch
}
"#;

fn bench_scan_go_source(c: &mut Criterion) {
    c.bench_function("scan_go_source", |b| {
        b.iter(|| {
            let (tokens, diagnostics) = tokenize_with_mode(black_box(GO_SOURCE), ScanMode::SOURCE);
            black_box((tokens, diagnostics));
        });
    });
}

fn bench_decode_literals(c: &mut Criterion) {
    let (tokens, _) = tokenize_with_mode(GO_SOURCE, ScanMode::default());
    let literals: Vec<_> = tokens.into_iter().filter(|t| t.kind.is_literal()).collect();
    c.bench_function("decode_literals", |b| {
        b.iter(|| {
            for token in &literals {
                let value = literal::decode(black_box(token.kind), black_box(&token.text));
                black_box(value.ok());
            }
        });
    });
}

fn bench_scan_invalid_literals(c: &mut Criterion) {
    let source = "42_ 4__2 0_xBadFace 0x.p1 1p-2 0x1.5e-2 1_.5 1._5 '\\k' '\\xa' '\\400' \"\\uD800\"\n".repeat(64);
    c.bench_function("scan_invalid_literals", |b| {
        b.iter(|| {
            let (tokens, diagnostics) = tokenize_with_mode(black_box(&source), ScanMode::default());
            assert!(tokens.iter().any(|t| t.kind == TokenKind::Char));
            black_box(diagnostics);
        });
    });
}

criterion_group!(benches, bench_scan_go_source, bench_decode_literals, bench_scan_invalid_literals);
criterion_main!(benches);
