//! Prometheus text exposition (format v0.0.4).
//!
//! One `# HELP`/`# TYPE` pair per family, then one line per series, with the
//! usual `_bucket`/`_sum`/`_count` expansion for histograms. Labels are
//! rendered in schema order; series within a family arrive pre-sorted from
//! the snapshot, so output is byte-stable between scrapes.

use std::fmt::Write;

use crate::model::{FamilySnapshot, SeriesValue};

/// Content type served alongside the rendered body.
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Render a full snapshot into the text exposition format.
pub fn render(families: &[FamilySnapshot]) -> String {
    let mut out = String::new();
    for family in families {
        render_family(family, &mut out);
    }
    out
}

fn render_family(family: &FamilySnapshot, out: &mut String) {
    let _ = writeln!(out, "# HELP {} {}", family.name, escape_help(&family.help));
    let _ = writeln!(out, "# TYPE {} {}", family.name, family.kind);

    for (values, value) in &family.series {
        let labels = label_pairs(&family.label_names, values);
        match value {
            SeriesValue::Gauge(v) | SeriesValue::Counter(v) => {
                let _ = writeln!(out, "{}{} {}", family.name, braced(&labels), fmt_value(*v));
            }
            SeriesValue::Histogram(hist) => {
                // `le` goes last, after the schema labels.
                let prefix = if labels.is_empty() {
                    String::new()
                } else {
                    format!("{labels},")
                };
                for (count, bound) in hist.buckets.iter().zip(&family.bucket_bounds) {
                    let _ = writeln!(
                        out,
                        "{}_bucket{{{}le=\"{}\"}} {}",
                        family.name,
                        prefix,
                        fmt_value(*bound),
                        count
                    );
                }
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"+Inf\"}} {}",
                    family.name, prefix, hist.count
                );
                let _ = writeln!(
                    out,
                    "{}_sum{} {}",
                    family.name,
                    braced(&labels),
                    fmt_value(hist.sum)
                );
                let _ = writeln!(out, "{}_count{} {}", family.name, braced(&labels), hist.count);
            }
        }
    }
}

fn label_pairs(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn braced(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{labels}}}")
    }
}

/// Escape a label value.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape a help string (backslash and newline only, per the format).
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn fmt_value(v: f64) -> String {
    if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        // f64 Display renders 1.0 as "1" and 0.5 as "0.5", matching the
        // exposition format's shortest-form convention.
        format!("{v}")
    }
}
