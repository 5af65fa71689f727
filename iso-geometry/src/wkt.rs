//! Well-known-text style reader and writer.
//!
//! The grammar uses the ISO names of the geometry types (`POINT`, `CURVE`, `SURFACE`, `MULTIPOINT`, `MULTICURVE`,
//! `MULTISURFACE`, `MULTIPRIMITIVE`, `COMPOSITEPOINT`, `COMPOSITECURVE`, `COMPOSITESURFACE`). The OGC names
//! `LINESTRING`, `POLYGON`, `MULTILINESTRING`, `MULTIPOLYGON` and `GEOMETRYCOLLECTION` are accepted as aliases.
//!
//! ```text
//! POINT(30 50)
//! CURVE(30 20, 10 50, 100 120)
//! SURFACE((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 4, 4 4, 4 2))
//! MULTIPOINT((0 0), (1 1))
//! MULTIPRIMITIVE(POINT(0 0), CURVE(1 1, 2 2))
//! ```
//!
//! Positions are whitespace separated ordinates, their number must match the dimension of the reference system.
//! Rings are closed automatically when the last position differs from the first one.

use crate::aggregate::Aggregate;
use crate::composite::Composite;
use crate::crs::CrsRef;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::primitive::{Curve, Point, Primitive, Ring, Surface, SurfaceBoundary};
use crate::precision::Precision;
use std::fmt::{Display, Formatter, Write};

/// Parses a geometry in the given reference system.
pub fn parse_wkt(text: &str, crs: &CrsRef) -> Result<Geometry, GeometryError> {
    parse_wkt_with(text, crs, &Precision::default())
}

/// Parses a geometry in the given reference system, validating surfaces with the given precision.
pub fn parse_wkt_with(
    text: &str,
    crs: &CrsRef,
    precision: &Precision,
) -> Result<Geometry, GeometryError> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        index: 0,
        crs,
        precision,
    };

    let geometry = parser.geometry()?;
    if let Some(token) = parser.peek() {
        return Err(GeometryError::MalformedInput(format!(
            "unexpected {token} after the end of the geometry"
        )));
    }

    log::trace!("Parsed {:?} with {} positions", geometry.kind(), geometry.positions().count());
    Ok(geometry)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    Open,
    Close,
    Comma,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(word) => write!(f, "'{word}'"),
            Token::Number(value) => write!(f, "number {value}"),
            Token::Open => write!(f, "'('"),
            Token::Close => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, GeometryError> {
    let mut tokens = vec![];
    let mut chars = text.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if !c.is_ascii_alphanumeric() && c != '_' {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Word(text[start..end].to_ascii_uppercase()));
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                let mut end = start;
                let mut previous = ' ';
                while let Some(&(i, c)) = chars.peek() {
                    let exponent_sign = matches!(c, '-' | '+') && matches!(previous, 'e' | 'E');
                    let leading_sign = matches!(c, '-' | '+') && i == start;
                    if !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E') || exponent_sign || leading_sign) {
                        break;
                    }
                    end = i + c.len_utf8();
                    previous = c;
                    chars.next();
                }

                let literal = &text[start..end];
                let value = literal.parse::<f64>().map_err(|_| {
                    GeometryError::MalformedInput(format!("invalid number '{literal}'"))
                })?;
                tokens.push(Token::Number(value));
            }
            other => {
                return Err(GeometryError::MalformedInput(format!(
                    "unexpected character '{other}' at offset {start}"
                )))
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    index: usize,
    crs: &'a CrsRef,
    precision: &'a Precision,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Result<Token, GeometryError> {
        let token = self.tokens.get(self.index).cloned().ok_or_else(|| {
            GeometryError::MalformedInput("unexpected end of input".into())
        })?;
        self.index += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), GeometryError> {
        let token = self.next()?;
        if token != expected {
            return Err(GeometryError::MalformedInput(format!(
                "expected {expected}, got {token}"
            )));
        }

        Ok(())
    }

    /// Consumes `EMPTY` if it is the next token.
    fn empty(&mut self) -> bool {
        if self.peek() == Some(&Token::Word("EMPTY".into())) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Parses `( item, item, ... )`.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, GeometryError>,
    ) -> Result<Vec<T>, GeometryError> {
        self.expect(Token::Open)?;
        let mut items = vec![item(self)?];
        loop {
            match self.next()? {
                Token::Comma => items.push(item(self)?),
                Token::Close => return Ok(items),
                token => {
                    return Err(GeometryError::MalformedInput(format!(
                        "expected ',' or ')', got {token}"
                    )))
                }
            }
        }
    }

    /// Parses `EMPTY` or a list of aggregate members.
    fn aggregate<T: GeometryElement>(
        &mut self,
        item: impl FnMut(&mut Self) -> Result<T, GeometryError>,
    ) -> Result<Aggregate<T>, GeometryError> {
        if self.empty() {
            return Ok(Aggregate::empty(self.crs.clone()));
        }

        Aggregate::new(self.crs.clone(), self.list(item)?)
    }

    fn geometry(&mut self) -> Result<Geometry, GeometryError> {
        let keyword = match self.next()? {
            Token::Word(word) => word,
            token => {
                return Err(GeometryError::MalformedInput(format!(
                    "expected geometry type, got {token}"
                )))
            }
        };

        let crs = self.crs.clone();
        Ok(match keyword.as_str() {
            "POINT" => Geometry::Point(self.point_body()?),
            "CURVE" | "LINESTRING" => Geometry::Curve(self.curve_body()?),
            "SURFACE" | "POLYGON" => Geometry::Surface(self.surface_body()?),
            "MULTIPOINT" => Geometry::MultiPoint(self.aggregate(Self::multi_point_member)?),
            "MULTICURVE" | "MULTILINESTRING" => Geometry::MultiCurve(self.aggregate(Self::curve_body)?),
            "MULTISURFACE" | "MULTIPOLYGON" => {
                Geometry::MultiSurface(self.aggregate(Self::surface_body)?)
            }
            "MULTIPRIMITIVE" | "GEOMETRYCOLLECTION" => {
                let members = if self.empty() {
                    vec![]
                } else {
                    self.list(Self::geometry)?
                };
                Geometry::MultiPrimitive(Aggregate::new(
                    crs,
                    members.into_iter().flat_map(Geometry::into_primitives).collect(),
                )?)
            }
            "COMPOSITEPOINT" => Geometry::CompositePoint(Composite::new(vec![self.point_body()?])?),
            "COMPOSITECURVE" => Geometry::CompositeCurve(Composite::new(self.list(Self::curve_body)?)?),
            "COMPOSITESURFACE" => {
                Geometry::CompositeSurface(Composite::new(self.list(Self::surface_body)?)?)
            }
            other => {
                return Err(GeometryError::MalformedInput(format!(
                    "unknown geometry type '{other}'"
                )))
            }
        })
    }

    fn position(&mut self) -> Result<Position, GeometryError> {
        let mut ordinates = vec![];
        while let Some(Token::Number(value)) = self.peek() {
            ordinates.push(*value);
            self.index += 1;
        }

        if ordinates.is_empty() {
            let found = self
                .peek()
                .map_or_else(|| "end of input".to_string(), Token::to_string);
            return Err(GeometryError::MalformedInput(format!(
                "expected ordinates, got {found}"
            )));
        }

        Position::new(ordinates, self.crs.clone())
    }

    fn positions(&mut self) -> Result<Vec<Position>, GeometryError> {
        self.list(Self::position)
    }

    fn point_body(&mut self) -> Result<Point, GeometryError> {
        self.expect(Token::Open)?;
        let position = self.position()?;
        self.expect(Token::Close)?;
        Ok(Point::new(position))
    }

    /// Member of a multi point, with or without its own parentheses.
    fn multi_point_member(&mut self) -> Result<Point, GeometryError> {
        if self.peek() == Some(&Token::Open) {
            self.point_body()
        } else {
            Ok(Point::new(self.position()?))
        }
    }

    fn curve_body(&mut self) -> Result<Curve, GeometryError> {
        Curve::from_positions(self.positions()?)
    }

    fn ring(&mut self) -> Result<Ring, GeometryError> {
        Ring::from_positions(self.positions()?)
    }

    fn surface_body(&mut self) -> Result<Surface, GeometryError> {
        let mut rings = self.list(Self::ring)?.into_iter();
        let Some(exterior) = rings.next() else {
            return Err(GeometryError::MalformedInput(
                "surface must have an exterior ring".into(),
            ));
        };

        Ok(Surface::new(SurfaceBoundary::new_with(
            exterior,
            rings.collect(),
            self.precision,
        )?))
    }
}

fn write_positions<'a>(
    f: &mut Formatter<'_>,
    positions: impl Iterator<Item = &'a Position>,
) -> std::fmt::Result {
    f.write_char('(')?;
    for (index, position) in positions.enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_ordinates(f, position)?;
    }
    f.write_char(')')
}

fn write_ordinates(f: &mut Formatter<'_>, position: &Position) -> std::fmt::Result {
    for (index, value) in position.ordinates().iter().enumerate() {
        if index > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{value}")?;
    }

    Ok(())
}

fn write_surface(f: &mut Formatter<'_>, surface: &Surface) -> std::fmt::Result {
    f.write_char('(')?;
    for (index, ring) in surface.boundary().rings().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_positions(f, ring.positions())?;
    }
    f.write_char(')')
}

fn write_list<T>(
    f: &mut Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut Formatter<'_>, &T) -> std::fmt::Result,
) -> std::fmt::Result {
    if items.is_empty() {
        return f.write_str(" EMPTY");
    }

    f.write_char('(')?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    f.write_char(')')
}

fn write_primitive(f: &mut Formatter<'_>, primitive: &Primitive) -> std::fmt::Result {
    match primitive {
        Primitive::Point(point) => {
            f.write_str("POINT(")?;
            write_ordinates(f, point.position())?;
            f.write_char(')')
        }
        Primitive::Curve(curve) => {
            f.write_str("CURVE")?;
            write_positions(f, curve.positions())
        }
        Primitive::Surface(surface) => {
            f.write_str("SURFACE")?;
            write_surface(f, surface)
        }
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Geometry::Point(v) => write_primitive(f, &Primitive::Point(v.clone())),
            Geometry::Curve(v) => {
                f.write_str("CURVE")?;
                write_positions(f, v.positions())
            }
            Geometry::Surface(v) => {
                f.write_str("SURFACE")?;
                write_surface(f, v)
            }
            Geometry::MultiPoint(v) => {
                f.write_str("MULTIPOINT")?;
                write_list(f, v.members(), |f, p| {
                    f.write_char('(')?;
                    write_ordinates(f, p.position())?;
                    f.write_char(')')
                })
            }
            Geometry::MultiCurve(v) => {
                f.write_str("MULTICURVE")?;
                write_list(f, v.members(), |f, c| write_positions(f, c.positions()))
            }
            Geometry::MultiSurface(v) => {
                f.write_str("MULTISURFACE")?;
                write_list(f, v.members(), write_surface)
            }
            Geometry::MultiPrimitive(v) => {
                f.write_str("MULTIPRIMITIVE")?;
                write_list(f, v.members(), write_primitive)
            }
            Geometry::CompositePoint(v) => {
                f.write_str("COMPOSITEPOINT(")?;
                write_ordinates(f, v.point().position())?;
                f.write_char(')')
            }
            Geometry::CompositeCurve(v) => {
                f.write_str("COMPOSITECURVE")?;
                write_list(f, v.members(), |f, c| write_positions(f, c.positions()))
            }
            Geometry::CompositeSurface(v) => {
                f.write_str("COMPOSITESURFACE")?;
                write_list(f, v.members(), write_surface)
            }
        }
    }
}

impl Geometry {
    /// Text representation of the geometry.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }

    /// Parses a geometry in the given reference system.
    pub fn from_wkt(text: &str, crs: &CrsRef) -> Result<Geometry, GeometryError> {
        parse_wkt(text, crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::geometry::GeometryKind;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> Result<Geometry, GeometryError> {
        parse_wkt(text, &Crs::local_2d())
    }

    #[test]
    fn parses_all_kinds() {
        let cases = [
            ("POINT(30 50)", GeometryKind::Point),
            ("CURVE(30 20, 10 50, 100 120)", GeometryKind::Curve),
            ("LineString (0 0, 1 1)", GeometryKind::Curve),
            ("SURFACE((0 0, 10 0, 10 10, 0 10, 0 0))", GeometryKind::Surface),
            ("POLYGON((0 0, 10 0, 10 10, 0 10))", GeometryKind::Surface),
            ("MULTIPOINT((0 0), (1 1))", GeometryKind::MultiPoint),
            ("MULTIPOINT(0 0, 1 1)", GeometryKind::MultiPoint),
            ("MULTICURVE((0 0, 1 1), (2 2, 3 3))", GeometryKind::MultiCurve),
            ("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)))", GeometryKind::MultiSurface),
            ("MULTIPRIMITIVE(POINT(0 0), CURVE(1 1, 2 2))", GeometryKind::MultiPrimitive),
            ("GEOMETRYCOLLECTION EMPTY", GeometryKind::MultiPrimitive),
            ("COMPOSITEPOINT(1 1)", GeometryKind::CompositePoint),
            ("COMPOSITECURVE((0 0, 1 0), (1 0, 1 1))", GeometryKind::CompositeCurve),
            ("COMPOSITESURFACE(((0 0, 1 0, 1 1, 0 1)))", GeometryKind::CompositeSurface),
        ];

        for (text, kind) in cases {
            assert_eq!(parse(text).unwrap().kind(), kind, "{text}");
        }
    }

    #[test]
    fn rings_are_closed() {
        let Geometry::Surface(surface) = parse("SURFACE((0 0, 10 0, 10 10, 0 10))").unwrap() else {
            panic!("expected surface");
        };
        assert_eq!(surface.exterior().positions().count(), 5);
        assert_eq!(surface.area(), 100.0);
    }

    #[test]
    fn scientific_notation() {
        let Geometry::Point(point) = parse("POINT(-1.5e2 2E-1)").unwrap() else {
            panic!("expected point");
        };
        assert_eq!(point.position().ordinates(), &[-150.0, 0.2]);
    }

    #[test]
    fn malformed_input() {
        for text in [
            "",
            "POINT",
            "POINT(1 2",
            "POINT(1 2))",
            "POINT EMPTY",
            "HEXAGON(1 2)",
            "CURVE(1 2)",
            "CURVE(1 2,)",
            "POINT(1 2) POINT(3 4)",
            "POINT(1 # 2)",
        ] {
            assert_matches!(parse(text), Err(GeometryError::MalformedInput(_)), "{text}");
        }
    }

    #[test]
    fn ordinate_count_must_match() {
        assert_matches!(
            parse("POINT(1 2 3)"),
            Err(GeometryError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(parse_wkt("POINT(1 2 3)", &Crs::local_3d()).is_ok());
    }

    #[test]
    fn invalid_hole_is_rejected() {
        assert_matches!(
            parse("SURFACE((0 0, 4 0, 4 4, 0 4), (10 10, 11 10, 11 11))"),
            Err(GeometryError::MalformedInput(_))
        );
    }

    #[test]
    fn display_round_trip() {
        for text in [
            "POINT(30 50)",
            "CURVE(30 20, 10 50, 100 120)",
            "SURFACE((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 4, 4 4, 4 2, 2 2))",
            "MULTIPOINT((0 0), (1.5 1))",
            "MULTICURVE((0 0, 1 1), (2 2, 3 3))",
            "MULTISURFACE(((0 0, 1 0, 1 1, 0 0)), ((5 5, 6 5, 6 6, 5 5)))",
            "MULTIPRIMITIVE(POINT(0 0), CURVE(1 1, 2 2))",
            "MULTIPRIMITIVE EMPTY",
            "COMPOSITEPOINT(1 1)",
            "COMPOSITECURVE((0 0, 1 0), (1 0, 1 1))",
        ] {
            let geometry = parse(text).unwrap();
            assert_eq!(geometry.to_string(), text);
            assert_eq!(parse(&geometry.to_string()).unwrap(), geometry);
        }
    }
}
