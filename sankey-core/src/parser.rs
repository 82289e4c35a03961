//! Loader for the line-oriented Sankey input format
//!
//! ```text
//! <title>
//! <source label>[,<r>,<g>,<b>]
//! <destination label>,<flow>[,<r>,<g>,<b>]
//! ...
//! ```

use std::io::{BufRead, Read};

use nom::{
    character::complete::space0,
    combinator::all_consuming,
    number::complete::double,
    sequence::delimited,
    IResult, Parser,
};

use crate::model::{DestinationNode, Destinations, DiagramSpec, Rgb, SourceNode};
use crate::theme::{Theme, DEFAULT_SOURCE_COLOR_PALETTE_INDEX};

/// Parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("input is empty: expected a title line")]
    Empty,
    #[error("missing source record after the title line")]
    MissingSource,
    #[error("line {line}: record has no label")]
    EmptyLabel { line: usize },
    #[error("line {line}: expected at least {expected} comma-separated fields, found {found}")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: `{value}` is not a valid {field}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: flow must not be negative (got {value})")]
    NegativeFlow { line: usize, value: f64 },
    #[error("line {line}: no color given and the palette has no entry at index {index}")]
    PaletteExhausted { line: usize, index: usize },
    #[error("no destination records after the source record")]
    NoDestinations,
    #[error("destination flows sum to zero")]
    ZeroTotalFlow,
    #[error("failed to read input: {0}")]
    Read(String),
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Read(err.to_string())
    }
}

/// Parse a complete diagram with the default theme's palette
pub fn parse(input: &str) -> Result<DiagramSpec, ParseError> {
    parse_with_theme(input, &Theme::default())
}

/// Read a whole stream and parse it
pub fn load<R: BufRead>(mut reader: R, theme: &Theme) -> Result<DiagramSpec, ParseError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_with_theme(&input, theme)
}

/// Parse a complete diagram, taking fallback colors from `theme`
pub fn parse_with_theme(input: &str, theme: &Theme) -> Result<DiagramSpec, ParseError> {
    let mut lines = input.lines().enumerate().map(|(i, text)| (i + 1, text));

    let (_, title) = lines.next().ok_or(ParseError::Empty)?;
    let title = title.trim_end().to_string();

    let (line, text) = lines.next().ok_or(ParseError::MissingSource)?;
    let source = parse_source(line, text, theme)?;

    let mut destinations = Destinations::new();
    // Counts destination records only; blank lines do not take a palette slot
    let mut position = 0;
    for (line, text) in lines {
        if text.trim().is_empty() {
            continue;
        }
        let node = parse_destination(line, text, position, theme)?;
        if let Some(previous) = destinations.insert(node) {
            tracing::debug!(
                line,
                label = %previous.label,
                replaced_flow = previous.flow,
                "repeated destination label replaces earlier record"
            );
        }
        position += 1;
    }

    if destinations.is_empty() {
        return Err(ParseError::NoDestinations);
    }
    if destinations.total_flow() <= 0.0 {
        return Err(ParseError::ZeroTotalFlow);
    }

    let spec = DiagramSpec {
        title,
        source,
        destinations,
    };
    tracing::debug!(?spec, "loaded diagram");
    Ok(spec)
}

fn parse_source(line: usize, text: &str, theme: &Theme) -> Result<SourceNode, ParseError> {
    let fields = split_record(text);
    let label = label(line, &fields)?;

    let color = if fields.len() == 4 {
        parse_color(line, &fields[1..4])?
    } else {
        theme.default_source_color()
    };

    Ok(SourceNode { label, color })
}

fn parse_destination(
    line: usize,
    text: &str,
    position: usize,
    theme: &Theme,
) -> Result<DestinationNode, ParseError> {
    let fields = split_record(text);
    if fields.len() < 2 {
        return Err(ParseError::MissingField {
            line,
            expected: 2,
            found: fields.len(),
        });
    }
    let label = label(line, &fields)?;

    let flow = parse_number(fields[1]).ok_or_else(|| ParseError::InvalidNumber {
        line,
        field: "flow",
        value: fields[1].to_string(),
    })?;
    if flow < 0.0 {
        return Err(ParseError::NegativeFlow { line, value: flow });
    }

    let color = if fields.len() >= 5 {
        parse_color(line, &fields[2..5])?
    } else {
        theme
            .destination_color(position)
            .ok_or(ParseError::PaletteExhausted {
                line,
                index: position + DEFAULT_SOURCE_COLOR_PALETTE_INDEX + 1,
            })?
    };

    Ok(DestinationNode { label, flow, color })
}

fn label(line: usize, fields: &[&str]) -> Result<String, ParseError> {
    match fields.first() {
        Some(label) if !label.is_empty() => Ok(label.to_string()),
        _ => Err(ParseError::EmptyLabel { line }),
    }
}

fn parse_color(line: usize, channels: &[&str]) -> Result<Rgb, ParseError> {
    let mut values = [0.0; 3];
    for (value, field) in values.iter_mut().zip(channels) {
        *value = parse_number(field).ok_or_else(|| ParseError::InvalidNumber {
            line,
            field: "color channel",
            value: field.to_string(),
        })?;
    }
    Ok(Rgb::new(values[0], values[1], values[2]))
}

/// Split a record into trimmed comma-separated fields
fn split_record(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).collect()
}

fn number(input: &str) -> IResult<&str, f64> {
    delimited(space0, double, space0).parse(input)
}

/// A finite real number filling the whole field
fn parse_number(field: &str) -> Option<f64> {
    all_consuming(number)
        .parse(field)
        .ok()
        .map(|(_, value)| value)
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_source_and_destinations() {
        let spec = parse("Budget\nIncome,10,20,30\nRent,800,1,2,3\nFood,200\n").unwrap();
        assert_eq!(spec.title, "Budget");
        assert_eq!(spec.source.label, "Income");
        assert_eq!(spec.source.color, Rgb::new(10.0, 20.0, 30.0));
        assert_eq!(spec.destinations.len(), 2);

        let rent = spec.destinations.get("Rent").unwrap();
        assert_eq!(rent.flow, 800.0);
        assert_eq!(rent.color, Rgb::new(1.0, 2.0, 3.0));

        // second destination record takes the second slot after the source's
        let food = spec.destinations.get("Food").unwrap();
        assert_eq!(food.color, Rgb::new(0.0, 130.0, 200.0));
    }

    #[test]
    fn test_source_without_color_uses_default() {
        let spec = parse("T\nIncome\nA,1\n").unwrap();
        assert_eq!(spec.source.color, Theme::default().default_source_color());
    }

    #[test]
    fn test_source_color_needs_exactly_four_fields() {
        let spec = parse("T\nIncome,1,2\nA,1\n").unwrap();
        assert_eq!(spec.source.color, Theme::default().default_source_color());

        let spec = parse("T\nIncome,1,2,3,4\nA,1\n").unwrap();
        assert_eq!(spec.source.color, Theme::default().default_source_color());
    }

    #[test]
    fn test_title_keeps_inner_whitespace() {
        let spec = parse("  Monthly budget  \r\nIncome\nA,1").unwrap();
        assert_eq!(spec.title, "  Monthly budget");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let spec = parse("T\n Income , 1 , 2 , 3 \n Rent ,  5.5 \n").unwrap();
        assert_eq!(spec.source.label, "Income");
        assert_eq!(spec.source.color, Rgb::new(1.0, 2.0, 3.0));
        assert_eq!(spec.destinations.get("Rent").map(|d| d.flow), Some(5.5));
    }

    #[test]
    fn test_palette_assignment_starts_after_default_source_slot() {
        let spec = parse("T\nS\nA,10\nB,20\nC,30\n").unwrap();
        let theme = Theme::default();
        let colors: Vec<Rgb> = spec.destinations.iter().map(|d| d.color).collect();
        assert_eq!(
            colors,
            vec![
                theme.palette[DEFAULT_SOURCE_COLOR_PALETTE_INDEX + 1],
                theme.palette[DEFAULT_SOURCE_COLOR_PALETTE_INDEX + 2],
                theme.palette[DEFAULT_SOURCE_COLOR_PALETTE_INDEX + 3],
            ]
        );
    }

    #[test]
    fn test_explicit_color_still_consumes_palette_position() {
        let spec = parse("T\nS\nA,1,9,9,9\nB,1\n").unwrap();
        let b = spec.destinations.get("B").unwrap();
        assert_eq!(b.color, Theme::default().destination_color(1).unwrap());
    }

    #[test]
    fn test_repeated_label_overwrites_in_place() {
        let spec = parse("T\nS\nA,1\nB,2\nA,5\n").unwrap();
        assert_eq!(spec.destinations.len(), 2);
        assert_eq!(spec.destinations.labels().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(spec.destinations.get("A").map(|d| d.flow), Some(5.0));
        assert_eq!(spec.total_flow(), 7.0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let spec = parse("T\nS\n\nA,1\n   \nB,2\n\n").unwrap();
        assert_eq!(spec.destinations.len(), 2);
        let b = spec.destinations.get("B").unwrap();
        assert_eq!(b.color, Theme::default().destination_color(1).unwrap());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(ParseError::Empty));
    }

    #[test]
    fn test_missing_source() {
        assert_eq!(parse("Title only\n"), Err(ParseError::MissingSource));
    }

    #[test]
    fn test_empty_source_label() {
        assert_eq!(parse("T\n,1,2,3\nA,1"), Err(ParseError::EmptyLabel { line: 2 }));
    }

    #[test]
    fn test_no_destinations() {
        assert_eq!(parse("T\nS\n"), Err(ParseError::NoDestinations));
    }

    #[test]
    fn test_destination_without_flow() {
        assert_eq!(
            parse("T\nS\nLonely\n"),
            Err(ParseError::MissingField {
                line: 3,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_non_numeric_flow() {
        assert_eq!(
            parse("T\nS\nA,lots\n"),
            Err(ParseError::InvalidNumber {
                line: 3,
                field: "flow",
                value: "lots".to_string()
            })
        );
    }

    #[test]
    fn test_non_finite_flow_rejected() {
        assert!(matches!(
            parse("T\nS\nA,inf\n"),
            Err(ParseError::InvalidNumber { line: 3, .. })
        ));
        assert!(matches!(
            parse("T\nS\nA,NaN\n"),
            Err(ParseError::InvalidNumber { line: 3, .. })
        ));
    }

    #[test]
    fn test_negative_flow() {
        assert_eq!(
            parse("T\nS\nA,-4\n"),
            Err(ParseError::NegativeFlow { line: 3, value: -4.0 })
        );
    }

    #[test]
    fn test_bad_color_channel() {
        assert_eq!(
            parse("T\nS\nA,1,red,0,0\n"),
            Err(ParseError::InvalidNumber {
                line: 3,
                field: "color channel",
                value: "red".to_string()
            })
        );
    }

    #[test]
    fn test_out_of_range_color_is_kept() {
        let spec = parse("T\nS,300,-5,12.5\nA,1\n").unwrap();
        assert_eq!(spec.source.color, Rgb::new(300.0, -5.0, 12.5));
    }

    #[test]
    fn test_zero_total_flow() {
        assert_eq!(parse("T\nS\nA,0\nB,0.0\n"), Err(ParseError::ZeroTotalFlow));
    }

    #[test]
    fn test_palette_exhausted() {
        let mut input = String::from("T\nS\n");
        for i in 0..20 {
            input.push_str(&format!("D{},1\n", i));
        }
        assert_eq!(
            parse(&input),
            Err(ParseError::PaletteExhausted { line: 22, index: 21 })
        );
    }

    #[test]
    fn test_palette_exhaustion_ignored_when_colors_given() {
        let mut input = String::from("T\nS\n");
        for i in 0..30 {
            input.push_str(&format!("D{},1,0,0,0\n", i));
        }
        assert_eq!(parse(&input).map(|s| s.destinations.len()), Ok(30));
    }

    #[test]
    fn test_empty_fields_surface_as_record_errors() {
        assert_eq!(parse("T\nS\n,5\n"), Err(ParseError::EmptyLabel { line: 3 }));
        assert_eq!(
            parse("T\nS\nA,,1\n"),
            Err(ParseError::InvalidNumber {
                line: 3,
                field: "flow",
                value: String::new()
            })
        );
        assert_eq!(
            parse("T\nS\n,,,\n"),
            Err(ParseError::EmptyLabel { line: 3 })
        );
    }

    #[test]
    fn test_load_from_buffered_reader() {
        let reader = std::io::BufReader::new(std::io::Cursor::new("T\nS\nA,3\nB,1\n"));
        let spec = load(reader, &Theme::default()).unwrap();
        assert_eq!(spec.destinations.len(), 2);
        assert_eq!(spec.total_flow(), 4.0);
    }

    #[test]
    fn test_load_from_reader() {
        let input: &[u8] = b"T\nS\nA,3\n";
        let spec = load(input, &Theme::plain()).unwrap();
        assert_eq!(spec.destinations.get("A").map(|d| d.color), Theme::plain().destination_color(0));
    }
}
