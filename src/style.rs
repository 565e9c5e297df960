use log::trace;

use crate::color::Color;
use crate::types::{GeometryKind, MARKER_ROTATION, MARKER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fill {
    pub color: Color,
    pub opacity: f64,
}

/// The mark drawn at each point, a square by default.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mark {
    pub fill: Fill,
    pub stroke: Stroke,
    pub opacity: f64,
    pub size: f64,
    /// degrees
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbolizer {
    Point(Mark),
    Line { stroke: Stroke },
    Polygon { stroke: Stroke, fill: Fill },
}

impl Symbolizer {
    pub fn stroke(&self) -> &Stroke {
        match self {
            Symbolizer::Point(mark) => &mark.stroke,
            Symbolizer::Line {
                stroke,
            } => stroke,
            Symbolizer::Polygon {
                stroke,
                ..
            } => stroke,
        }
    }

    pub fn fill(&self) -> Option<&Fill> {
        match self {
            Symbolizer::Point(mark) => Some(&mark.fill),
            Symbolizer::Line {
                ..
            } => None,
            Symbolizer::Polygon {
                fill,
                ..
            } => Some(fill),
        }
    }

    pub fn mark(&self) -> Option<&Mark> {
        match self {
            Symbolizer::Point(mark) => Some(mark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleRule {
    kind: GeometryKind,
    symbolizer: Symbolizer,
}

impl StyleRule {
    pub fn new(kind: GeometryKind, symbolizer: Symbolizer) -> Self {
        Self {
            kind,
            symbolizer,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn symbolizer(&self) -> &Symbolizer {
        &self.symbolizer
    }
}

/// Rendering rules, one per [`GeometryKind`], in kind order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    rules: Vec<StyleRule>,
}

impl Style {
    pub fn from_rules(rules: Vec<StyleRule>) -> Self {
        Self {
            rules,
        }
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn rule_for(&self, kind: GeometryKind) -> Option<&StyleRule> {
        self.rules
            .iter()
            .find(|rule| rule.kind == kind)
    }

    /// `true` if there is exactly one rule per kind, in kind order, and each symbolizer matches its kind.
    pub fn is_complete(&self) -> bool {
        self.rules.len() == GeometryKind::ALL.len()
            && self
                .rules
                .iter()
                .zip(GeometryKind::ALL)
                .all(|(rule, kind)| {
                    rule.kind == kind
                        && matches!(
                            (kind, &rule.symbolizer),
                            (GeometryKind::Point, Symbolizer::Point(_))
                                | (GeometryKind::Line, Symbolizer::Line { .. })
                                | (GeometryKind::Polygon, Symbolizer::Polygon { .. })
                        )
                })
    }
}

pub struct StyleBuilder;

impl StyleBuilder {
    pub fn build_style(stroke_color: Color, fill_color: Color) -> Style {
        let rules = GeometryKind::ALL
            .iter()
            .map(|kind| Self::build_rule(*kind, stroke_color, fill_color))
            .collect::<Vec<_>>();

        trace!(
            "built style. stroke: {:?}, fill: {:?}, rules: {}",
            stroke_color,
            fill_color,
            rules.len()
        );

        Style::from_rules(rules)
    }

    fn build_rule(kind: GeometryKind, stroke_color: Color, fill_color: Color) -> StyleRule {
        let stroke = Stroke {
            color: stroke_color,
            width: kind.stroke_width(),
        };
        let fill = Fill {
            color: fill_color,
            opacity: kind.fill_opacity(),
        };

        StyleRule::new(kind, Self::build_symbolizer(kind, stroke, fill))
    }

    fn build_symbolizer(kind: GeometryKind, stroke: Stroke, fill: Fill) -> Symbolizer {
        match kind {
            GeometryKind::Point => Symbolizer::Point(Mark {
                fill,
                stroke,
                opacity: kind.fill_opacity(),
                size: MARKER_SIZE,
                rotation: MARKER_ROTATION,
            }),
            GeometryKind::Line => Symbolizer::Line {
                stroke,
            },
            GeometryKind::Polygon => Symbolizer::Polygon {
                stroke,
                fill,
            },
        }
    }
}
