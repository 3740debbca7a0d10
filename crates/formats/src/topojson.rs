//! TopoJSON topology decoding.
//!
//! A topology stores shared border arcs once, delta-encoded and quantized,
//! and geometries reference them by index (negative index = reversed arc,
//! one's complement). This module decodes arcs to absolute degrees and
//! assembles polygon rings from arc references.
//!
//! Parsing walks `serde_json::Value` by hand rather than deriving: the
//! format mixes heterogeneous arrays (arcs, nested ring references) that
//! map poorly onto derive-based structs.

use serde_json::Value;

#[derive(Debug)]
pub enum TopoJsonError {
    InvalidJson { reason: String },
    NotATopology,
    MissingObject { name: String },
    InvalidArc { index: usize, reason: String },
    InvalidArcIndex { reference: i64 },
    InvalidGeometry { index: usize, reason: String },
}

impl std::fmt::Display for TopoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopoJsonError::InvalidJson { reason } => write!(f, "invalid JSON: {reason}"),
            TopoJsonError::NotATopology => write!(f, "expected a TopoJSON Topology"),
            TopoJsonError::MissingObject { name } => {
                write!(f, "topology has no object named {name:?}")
            }
            TopoJsonError::InvalidArc { index, reason } => {
                write!(f, "invalid arc at index {index}: {reason}")
            }
            TopoJsonError::InvalidArcIndex { reference } => {
                write!(f, "arc reference {reference} is out of range")
            }
            TopoJsonError::InvalidGeometry { index, reason } => {
                write!(f, "invalid geometry at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for TopoJsonError {}

/// One ring as arc references; negative references select the reversed arc.
pub type ArcRing = Vec<i64>;

#[derive(Debug, Clone, PartialEq)]
pub enum TopoGeometryKind {
    /// Rings of arc references; ring 0 is the exterior.
    Polygon(Vec<ArcRing>),
    MultiPolygon(Vec<Vec<ArcRing>>),
    /// Present in the input but not a polygon; kept so positional ids stay
    /// aligned with the source dataset.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopoGeometry {
    /// The geometry-level identifier (world-atlas stores the numeric
    /// country code here).
    pub id: Option<String>,
    /// `properties.name`, when present.
    pub name: Option<String>,
    pub kind: TopoGeometryKind,
}

/// A decoded topology: arcs in absolute degrees plus named objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    arcs: Vec<Vec<(f64, f64)>>,
    objects: Vec<(String, Vec<TopoGeometry>)>,
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| TopoJsonError::InvalidJson {
                reason: e.to_string(),
            })?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, TopoJsonError> {
        let obj = value.as_object().ok_or(TopoJsonError::NotATopology)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(TopoJsonError::NotATopology)?;
        if ty != "Topology" {
            return Err(TopoJsonError::NotATopology);
        }

        let transform = parse_transform(obj.get("transform"))?;
        let arcs = parse_arcs(obj.get("arcs"), transform)?;

        let mut objects = Vec::new();
        if let Some(map) = obj.get("objects").and_then(|v| v.as_object()) {
            for (name, object_val) in map {
                objects.push((name.clone(), parse_object_geometries(object_val)?));
            }
        }

        Ok(Self { arcs, objects })
    }

    /// Geometries of a named object, in dataset order.
    pub fn object(&self, name: &str) -> Result<&[TopoGeometry], TopoJsonError> {
        self.objects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| g.as_slice())
            .ok_or_else(|| TopoJsonError::MissingObject {
                name: name.to_string(),
            })
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Assemble a closed ring (first point repeated at the end) from arc
    /// references, stitching shared endpoints between consecutive arcs.
    pub fn ring_coordinates(&self, refs: &[i64]) -> Result<Vec<(f64, f64)>, TopoJsonError> {
        let mut out: Vec<(f64, f64)> = Vec::new();

        for &reference in refs {
            let (index, reversed) = if reference < 0 {
                // One's complement addressing: ~i selects arc i reversed.
                ((!reference) as usize, true)
            } else {
                (reference as usize, false)
            };

            let arc = self
                .arcs
                .get(index)
                .ok_or(TopoJsonError::InvalidArcIndex { reference })?;

            let points: Box<dyn Iterator<Item = &(f64, f64)>> = if reversed {
                Box::new(arc.iter().rev())
            } else {
                Box::new(arc.iter())
            };

            for (i, &p) in points.enumerate() {
                // Consecutive arcs share an endpoint; drop the duplicate.
                if i == 0 && !out.is_empty() {
                    continue;
                }
                out.push(p);
            }
        }

        Ok(out)
    }
}

#[derive(Debug, Copy, Clone)]
struct Transform {
    scale: (f64, f64),
    translate: (f64, f64),
}

fn parse_transform(value: Option<&Value>) -> Result<Option<Transform>, TopoJsonError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let obj = value.as_object().ok_or(TopoJsonError::NotATopology)?;

    let pair = |key: &str| -> Result<(f64, f64), TopoJsonError> {
        let arr = obj
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or(TopoJsonError::NotATopology)?;
        match (arr.first().and_then(Value::as_f64), arr.get(1).and_then(Value::as_f64)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(TopoJsonError::NotATopology),
        }
    };

    Ok(Some(Transform {
        scale: pair("scale")?,
        translate: pair("translate")?,
    }))
}

fn parse_arcs(
    value: Option<&Value>,
    transform: Option<Transform>,
) -> Result<Vec<Vec<(f64, f64)>>, TopoJsonError> {
    let arcs_val = value
        .and_then(|v| v.as_array())
        .ok_or(TopoJsonError::NotATopology)?;

    let mut arcs = Vec::with_capacity(arcs_val.len());
    for (index, arc_val) in arcs_val.iter().enumerate() {
        let points_val = arc_val
            .as_array()
            .ok_or_else(|| TopoJsonError::InvalidArc {
                index,
                reason: "arc must be an array of positions".to_string(),
            })?;

        let mut points = Vec::with_capacity(points_val.len());
        // Quantized arcs are delta-encoded; the running sum lives in the
        // quantized integer space, transformed on output.
        let mut qx = 0.0;
        let mut qy = 0.0;

        for pos_val in points_val {
            let pos = pos_val
                .as_array()
                .ok_or_else(|| TopoJsonError::InvalidArc {
                    index,
                    reason: "position must be an array".to_string(),
                })?;
            let (x, y) = match (
                pos.first().and_then(Value::as_f64),
                pos.get(1).and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(TopoJsonError::InvalidArc {
                        index,
                        reason: "position must hold two numbers".to_string(),
                    });
                }
            };

            match transform {
                Some(t) => {
                    qx += x;
                    qy += y;
                    points.push((qx * t.scale.0 + t.translate.0, qy * t.scale.1 + t.translate.1));
                }
                None => points.push((x, y)),
            }
        }

        if points.len() < 2 {
            return Err(TopoJsonError::InvalidArc {
                index,
                reason: format!("arc has {} point(s), need at least 2", points.len()),
            });
        }
        arcs.push(points);
    }

    Ok(arcs)
}

fn parse_object_geometries(value: &Value) -> Result<Vec<TopoGeometry>, TopoJsonError> {
    let obj = value.as_object().ok_or(TopoJsonError::NotATopology)?;
    let ty = obj.get("type").and_then(|v| v.as_str()).unwrap_or("");

    if ty == "GeometryCollection" {
        let geoms = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or(TopoJsonError::NotATopology)?;
        return geoms
            .iter()
            .enumerate()
            .map(|(index, g)| parse_geometry(index, g))
            .collect();
    }

    // A bare geometry object (e.g. the single land MultiPolygon).
    Ok(vec![parse_geometry(0, value)?])
}

fn parse_geometry(index: usize, value: &Value) -> Result<TopoGeometry, TopoJsonError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TopoJsonError::InvalidGeometry {
            index,
            reason: "geometry must be an object".to_string(),
        })?;

    let id = obj.get("id").map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    let name = obj
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(|s| s.to_string());

    let kind = match obj.get("type").and_then(|v| v.as_str()) {
        Some("Polygon") => {
            TopoGeometryKind::Polygon(parse_arc_rings(index, obj.get("arcs"))?)
        }
        Some("MultiPolygon") => {
            let polys_val = obj
                .get("arcs")
                .and_then(|v| v.as_array())
                .ok_or_else(|| TopoJsonError::InvalidGeometry {
                    index,
                    reason: "MultiPolygon missing arcs".to_string(),
                })?;
            let mut polys = Vec::with_capacity(polys_val.len());
            for poly_val in polys_val {
                polys.push(parse_arc_rings(index, Some(poly_val))?);
            }
            TopoGeometryKind::MultiPolygon(polys)
        }
        _ => TopoGeometryKind::Unsupported,
    };

    Ok(TopoGeometry { id, name, kind })
}

fn parse_arc_rings(index: usize, value: Option<&Value>) -> Result<Vec<ArcRing>, TopoJsonError> {
    let rings_val = value
        .and_then(|v| v.as_array())
        .ok_or_else(|| TopoJsonError::InvalidGeometry {
            index,
            reason: "Polygon missing arcs".to_string(),
        })?;

    let mut rings = Vec::with_capacity(rings_val.len());
    for ring_val in rings_val {
        let refs_val = ring_val
            .as_array()
            .ok_or_else(|| TopoJsonError::InvalidGeometry {
                index,
                reason: "ring must be an array of arc references".to_string(),
            })?;
        let mut refs = Vec::with_capacity(refs_val.len());
        for r in refs_val {
            let n = r.as_i64().ok_or_else(|| TopoJsonError::InvalidGeometry {
                index,
                reason: "arc reference must be an integer".to_string(),
            })?;
            refs.push(n);
        }
        rings.push(refs);
    }
    Ok(rings)
}
