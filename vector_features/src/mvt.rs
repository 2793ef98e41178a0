use anyhow::{bail, Result};

const MOVE_TO: u32 = 1;
const LINE_TO: u32 = 2;
const CLOSE_PATH: u32 = 7;

fn zigzag(value: u32) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Decodes the geometry commands of a Mapbox vector tile polygon into closed rings. Coordinates
/// are scaled from `[0, extent]` to `[0, size]` meters. Both the tile and the output keep y
/// pointing down, so ring winding is preserved.
pub fn decode_polygon(commands: &[u32], extent: u32, size: f64) -> Result<Vec<Vec<[f64; 2]>>> {
    if extent == 0 {
        bail!("Vector tile layer has an extent of 0");
    }
    let scale = size / extent as f64;

    let mut rings = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    let (mut x, mut y) = (0_i64, 0_i64);
    let mut idx = 0;

    while idx < commands.len() {
        let command = commands[idx] & 0x7;
        let count = (commands[idx] >> 3) as usize;
        idx += 1;

        match command {
            MOVE_TO | LINE_TO => {
                if command == LINE_TO && current.is_empty() {
                    bail!("LineTo before any MoveTo in polygon geometry");
                }
                if idx + count * 2 > commands.len() {
                    bail!(
                        "Polygon geometry ends early: wanted {} parameters, only {} left",
                        count * 2,
                        commands.len() - idx
                    );
                }
                for _ in 0..count {
                    x += zigzag(commands[idx]);
                    y += zigzag(commands[idx + 1]);
                    idx += 2;
                    if command == MOVE_TO && !current.is_empty() {
                        close(&mut current, &mut rings);
                    }
                    current.push([x as f64 * scale, y as f64 * scale]);
                }
            }
            CLOSE_PATH => {
                close(&mut current, &mut rings);
            }
            other => bail!("Unknown vector tile command {}", other),
        }
    }
    close(&mut current, &mut rings);

    Ok(rings)
}

/// Rings with fewer than 3 points can't enclose anything and are dropped.
fn close(current: &mut Vec<[f64; 2]>, rings: &mut Vec<Vec<[f64; 2]>>) {
    let mut ring = std::mem::take(current);
    if ring.len() < 3 {
        return;
    }
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    rings.push(ring);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_ring_clockwise;

    fn command(id: u32, count: u32) -> u32 {
        (id & 0x7) | (count << 3)
    }

    fn param(value: i64) -> u32 {
        ((value << 1) ^ (value >> 63)) as u32
    }

    #[test]
    fn square_with_a_hole() {
        let commands = vec![
            command(MOVE_TO, 1),
            param(0),
            param(0),
            command(LINE_TO, 3),
            param(10),
            param(0),
            param(0),
            param(10),
            param(-10),
            param(0),
            command(CLOSE_PATH, 1),
            command(MOVE_TO, 1),
            param(2),
            param(-8),
            command(LINE_TO, 3),
            param(0),
            param(4),
            param(4),
            param(0),
            param(0),
            param(-4),
            command(CLOSE_PATH, 1),
        ];
        let rings = decode_polygon(&commands, 10, 100.0).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(
            rings[0],
            vec![[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0], [0.0, 0.0]]
        );
        assert_eq!(rings[1][0], [20.0, 20.0]);
        assert_eq!(rings[1].len(), 5);
        assert!(is_ring_clockwise(&rings[0]));
        assert!(!is_ring_clockwise(&rings[1]));
    }

    #[test]
    fn malformed() {
        assert!(decode_polygon(&[command(LINE_TO, 1), param(1), param(1)], 10, 1.0).is_err());
        assert!(decode_polygon(&[command(MOVE_TO, 2), param(1)], 10, 1.0).is_err());
        assert!(decode_polygon(&[command(3, 1)], 10, 1.0).is_err());
        assert!(decode_polygon(&[], 0, 1.0).is_err());
        assert_eq!(decode_polygon(&[], 10, 1.0).unwrap().len(), 0);
    }
}
