//! Parsing of the compact text forms accepted on the command line.
//!
//! - numbers: `1.2, 3.4 5.6` (commas, semicolons or whitespace)
//! - points: `10,100; 20,150; 30,180` (pairs separated by `;` or newlines)
//! - matrix: `2,1; 1,3` (rows separated by `;` or newlines)
//! - formula inputs: `key=value`

use anyhow::{bail, Context, Result};
use matprop_core::numeric::{Point2D, SquareMatrix};

fn split_row(row: &str) -> impl Iterator<Item = &str> {
    row.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty())
}

fn split_rows(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ';' || c == '\n').map(str::trim).filter(|r| !r.is_empty())
}

fn parse_number(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .with_context(|| format!("'{}' is not a number", token))
}

/// Parse a row of numbers.
pub fn parse_numbers(text: &str) -> Result<Vec<f64>> {
    split_row(&text.replace(';', " ")).map(parse_number).collect()
}

/// Parse `x,y` pairs.
pub fn parse_points(text: &str) -> Result<Vec<Point2D>> {
    split_rows(text)
        .map(|row| {
            let values: Vec<f64> = split_row(row).map(parse_number).collect::<Result<_>>()?;
            match values.as_slice() {
                [x, y] => Ok(Point2D::new(*x, *y)),
                _ => bail!("point '{}' must have exactly two values", row),
            }
        })
        .collect()
}

/// Parse a square matrix.
pub fn parse_matrix(text: &str) -> Result<SquareMatrix> {
    let rows = split_rows(text)
        .map(|row| split_row(row).map(parse_number).collect::<Result<Vec<f64>>>())
        .collect::<Result<Vec<_>>>()?;
    Ok(SquareMatrix::from_rows(rows)?)
}

/// clap value parser for `key=value`.
pub fn parse_key_value(text: &str) -> std::result::Result<(String, f64), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", text))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", text));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("1, 2 3;4").unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(parse_numbers("1, x").is_err());
        assert!(parse_numbers("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_points() {
        let points = parse_points("10,100; 20 150\n30, 180").unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Point2D::new(20.0, 150.0));
        assert!(parse_points("1,2,3").is_err());
    }

    #[test]
    fn test_parse_matrix() {
        let m = parse_matrix("2,1; 1,3").unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(1, 1), 3.0);
        assert!(parse_matrix("1,2; 3").is_err());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("force_n=1e4").unwrap(), ("force_n".to_string(), 1e4));
        assert!(parse_key_value("force_n").is_err());
        assert!(parse_key_value("=3").is_err());
        assert!(parse_key_value("a=b").is_err());
    }
}
