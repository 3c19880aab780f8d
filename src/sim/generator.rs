//! Procedural floor generation and streaming
//!
//! Floors are generated in sequence-number order. Every random draw for a
//! floor happens in a fixed order: type, width, x, cannon, moving direction,
//! then coins.

use glam::Vec2;

use super::difficulty::Difficulty;
use super::rng::RandomSource;
use super::state::{Coin, Floor, FloorType, MovingState, ShrinkState, Side, World};
use crate::consts::*;

/// Vertical position of a floor's top edge
#[inline]
pub fn floor_y(number: u32) -> f32 {
    FLOOR_BASELINE_Y - number as f32 * FLOOR_VERTICAL_SPACING
}

/// Floor-equivalent index of a vertical position (negative below floor 0)
#[inline]
pub fn floor_index_at(y: f32) -> i64 {
    ((FLOOR_BASELINE_Y - y) / FLOOR_VERTICAL_SPACING).floor() as i64
}

/// Pick the behavior type for a floor number
pub fn determine_floor_type(
    number: u32,
    difficulty: &Difficulty,
    rng: &mut dyn RandomSource,
) -> FloorType {
    if number % SPECIAL_FLOOR_INTERVAL == 0 && number >= SPECIAL_FLOOR_MIN_NUMBER {
        return FloorType::Special;
    }
    if number == 0 {
        return FloorType::Normal;
    }

    let mut moving = BASE_MOVING_FLOOR_CHANCE;
    let mut shrinking = BASE_SHRINKING_FLOOR_CHANCE;
    let mut breaking = BASE_BREAKING_FLOOR_CHANCE;

    if difficulty.active {
        let scale = difficulty.type_chance_scale();
        moving = (moving * scale).min(DIFFICULTY_MAX_CHANCE);
        shrinking = (shrinking * scale).min(DIFFICULTY_MAX_CHANCE);
        breaking = (breaking * scale).min(DIFFICULTY_MAX_CHANCE);
    }

    // First cumulative bucket wins; a draw exactly on a boundary falls through
    let roll = rng.next_f32();
    let mut cumulative = moving;
    if roll < cumulative {
        return FloorType::Moving;
    }
    cumulative += shrinking;
    if roll < cumulative {
        return FloorType::Shrinking;
    }
    cumulative += breaking;
    if roll < cumulative {
        return FloorType::Breaking;
    }
    FloorType::Normal
}

/// Choose x for a floor of `width` placed after `prev`
///
/// Stays within the horizontal gap limit of the previous floor and inside the
/// wall corridor, centering when that range is inverted.
pub fn floor_x_position(prev: Option<&Floor>, width: f32, rng: &mut dyn RandomSource) -> f32 {
    let corridor_min = WALL_LEFT_X + WALL_THICKNESS + FLOOR_MARGIN;
    let corridor_max = WALL_RIGHT_X - WALL_THICKNESS - FLOOR_MARGIN - width;

    match prev {
        Some(prev) => {
            let min_x = corridor_min.max(prev.x - FLOOR_MAX_HORIZONTAL_GAP);
            let max_x = corridor_max.min(prev.right() + FLOOR_MAX_HORIZONTAL_GAP - width);
            if min_x > max_x {
                (CANVAS_WIDTH - width) / 2.0
            } else {
                rng.range(min_x, max_x)
            }
        }
        None => rng.range(corridor_min, corridor_max.max(corridor_min)),
    }
}

/// A normal floor with no sub-state and full alpha
pub fn plain_floor(number: u32, x: f32, width: f32) -> Floor {
    Floor {
        number,
        x,
        y: floor_y(number),
        width,
        height: FLOOR_HEIGHT,
        kind: FloorType::Normal,
        is_special: number == 0,
        fade_alpha: 1.0,
        is_fading: false,
        is_breaking: false,
        moving: None,
        shrink: None,
        cannon: None,
        should_remove: false,
        coin_ids: Vec::new(),
    }
}

/// Build floor `number` without its coins
pub fn build_floor(
    number: u32,
    prev: Option<&Floor>,
    difficulty: &Difficulty,
    rng: &mut dyn RandomSource,
) -> Floor {
    let kind = determine_floor_type(number, difficulty, rng);

    let (width, x) = match kind {
        FloorType::Special => {
            let width = SPECIAL_FLOOR_WIDTH;
            (width, (CANVAS_WIDTH - width) / 2.0)
        }
        FloorType::Moving => {
            let width = rng.range(MOVING_FLOOR_MIN_WIDTH, MOVING_FLOOR_MAX_WIDTH);
            let x = rng.range(MOVING_FLOOR_MIN_X, MOVING_FLOOR_MAX_X - width);
            (width, x)
        }
        FloorType::Breaking => {
            let width = rng.range(BREAKING_FLOOR_MIN_WIDTH, BREAKING_FLOOR_MAX_WIDTH);
            (width, floor_x_position(prev, width, rng))
        }
        FloorType::Normal if number == 0 => {
            let width = START_FLOOR_WIDTH;
            (width, (CANVAS_WIDTH - width) / 2.0)
        }
        FloorType::Shrinking | FloorType::Normal => {
            let width = rng.range(FLOOR_MIN_WIDTH, FLOOR_MAX_WIDTH);
            (width, floor_x_position(prev, width, rng))
        }
    };

    let mut floor = plain_floor(number, x, width);
    floor.kind = kind;
    floor.is_special = kind == FloorType::Special || number == 0;

    if kind == FloorType::Shrinking {
        let multipliers = difficulty.multipliers();
        floor.shrink = Some(ShrinkState {
            delay: SHRINKING_FLOOR_START_DELAY * multipliers.shrinking_delay,
            origin_x: x,
            original_width: width,
        });
    }

    if number >= CANNON_MIN_FLOOR && rng.next_f32() < CANNON_CHANCE {
        // Cannon sits at the far end, pointing back across the tower
        let center = x + width / 2.0;
        floor.cannon = Some(if center < CANVAS_WIDTH / 2.0 {
            Side::Right
        } else {
            Side::Left
        });
    }

    if kind == FloorType::Moving {
        floor.moving = Some(MovingState {
            direction: rng.sign(),
            origin_x: x,
        });
    }

    floor
}

/// Coin positions for a floor, or none if the spawn roll fails
pub fn seed_coins(floor: &Floor, rng: &mut dyn RandomSource) -> Vec<Vec2> {
    if floor.number < MIN_FLOOR_FOR_COINS {
        return Vec::new();
    }

    let chance = (COIN_CHANCE_BASE + floor.number as f32 * COIN_CHANCE_PER_FLOOR).min(COIN_MAX_CHANCE);
    if rng.next_f32() > chance {
        return Vec::new();
    }

    let spread = (MAX_COINS_PER_FLOOR - MIN_COINS_PER_FLOOR + 1) as f32;
    let base = MIN_COINS_PER_FLOOR + (rng.next_f32() * spread).floor() as u32;
    let scaled = (base as f32 * COINS_PER_FLOOR_MULTIPLIER.powi(floor.number as i32)).floor() as u32;
    let count = scaled.min(MAX_COINS_PER_FLOOR);

    let margin = COIN_RADIUS * 3.0;
    let min_x = floor.x + margin;
    let max_x = floor.right() - margin;
    (0..count)
        .map(|_| Vec2::new(rng.range(min_x, max_x), floor.y + COIN_Y_OFFSET))
        .collect()
}

/// Generate floor `number` with its coins and append it to the world
pub fn spawn_floor(world: &mut World, number: u32) {
    let difficulty = world.difficulty;
    let prev = world.floors.last().cloned();
    let mut floor = build_floor(number, prev.as_ref(), &difficulty, world.rng());

    let positions = seed_coins(&floor, world.rng());
    for pos in positions {
        let id = world.next_entity_id();
        floor.coin_ids.push(id);
        world.coins.push(Coin {
            id,
            pos,
            radius: COIN_RADIUS,
            floor_number: number,
            collected: false,
        });
    }

    log::debug!(
        "Generated floor {} ({}) x={:.1} w={:.1} coins={} cannon={:?}",
        number,
        floor.kind.as_str(),
        floor.x,
        floor.width,
        floor.coin_ids.len(),
        floor.cannon
    );
    world.floors.push(floor);
}

/// Keep the floor window around the ball: generate ahead, prune far behind
pub fn stream_floors(world: &mut World) {
    let player_floor = floor_index_at(world.ball.pos.y);
    let highest = world.floors.iter().map(|f| f.number as i64).max().unwrap_or(0);

    let target = player_floor + FLOORS_TO_GENERATE_AHEAD;
    for number in (highest + 1)..=target {
        spawn_floor(world, number as u32);
    }

    let lowest_needed = player_floor - FLOORS_TO_GENERATE_BEHIND;
    if lowest_needed > 0 {
        world.coins.retain(|c| c.floor_number as i64 >= lowest_needed);
        world.floors.retain(|f| f.number as i64 >= lowest_needed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceSource;
    use crate::sim::test_support::world_with;
    use proptest::prelude::*;

    fn active_difficulty(max_floor: u32) -> Difficulty {
        let mut difficulty = Difficulty::default();
        difficulty.update(max_floor);
        difficulty
    }

    #[test]
    fn test_floor_zero_is_full_width_start() {
        let mut rng = SequenceSource::constant(0.0);
        let floor = build_floor(0, None, &Difficulty::default(), &mut rng);
        assert_eq!(floor.kind, FloorType::Normal);
        assert!(floor.is_special);
        assert_eq!(floor.width, START_FLOOR_WIDTH);
        assert_eq!(floor.x, 10.0);
        assert_eq!(floor.y, FLOOR_BASELINE_Y);
    }

    #[test]
    fn test_special_interval() {
        let mut rng = SequenceSource::constant(0.0);
        let difficulty = Difficulty::default();
        assert_eq!(determine_floor_type(100, &difficulty, &mut rng), FloorType::Special);
        assert_eq!(determine_floor_type(200, &difficulty, &mut rng), FloorType::Special);
        // Below the minimum number the interval does not apply
        assert_ne!(determine_floor_type(0, &difficulty, &mut rng), FloorType::Special);
    }

    #[test]
    fn test_type_buckets_in_order() {
        let difficulty = Difficulty::default();
        let cases = [
            (0.05, FloorType::Moving),
            (0.15, FloorType::Shrinking),
            (0.22, FloorType::Breaking),
            (0.26, FloorType::Normal),
            (0.9, FloorType::Normal),
        ];
        for (roll, expected) in cases {
            let mut rng = SequenceSource::constant(roll);
            assert_eq!(determine_floor_type(7, &difficulty, &mut rng), expected, "roll {roll}");
        }
    }

    #[test]
    fn test_boundary_roll_falls_through() {
        let mut rng = SequenceSource::constant(BASE_MOVING_FLOOR_CHANCE);
        assert_eq!(
            determine_floor_type(7, &Difficulty::default(), &mut rng),
            FloorType::Shrinking
        );
    }

    #[test]
    fn test_type_chances_scale_with_difficulty() {
        // Difficulty 3.0 scales chances by 2.0: moving covers [0, 0.2)
        let difficulty = active_difficulty(205);
        let mut rng = SequenceSource::constant(0.15);
        assert_eq!(determine_floor_type(7, &difficulty, &mut rng), FloorType::Moving);

        // Very high difficulty caps every bucket at the max chance
        let difficulty = active_difficulty(5_000);
        let mut rng = SequenceSource::constant(0.29);
        assert_eq!(determine_floor_type(7, &difficulty, &mut rng), FloorType::Moving);
        let mut rng = SequenceSource::constant(0.31);
        assert_eq!(determine_floor_type(7, &difficulty, &mut rng), FloorType::Shrinking);
    }

    #[test]
    fn test_x_position_respects_gap_and_corridor() {
        let prev = plain_floor(3, 20.0, 100.0);
        let mut rng = SequenceSource::constant(0.999);
        let x = floor_x_position(Some(&prev), 150.0, &mut rng);
        assert!(x >= 20.0);
        assert!(x + 150.0 <= 410.0 + 0.01);

        let mut rng = SequenceSource::constant(0.0);
        assert_eq!(floor_x_position(Some(&prev), 150.0, &mut rng), 20.0);
    }

    #[test]
    fn test_x_position_inverted_range_centers() {
        // Wider than the corridor allows: max < min
        let prev = plain_floor(3, 20.0, 100.0);
        let mut rng = SequenceSource::constant(0.5);
        let x = floor_x_position(Some(&prev), 400.0, &mut rng);
        assert_eq!(x, (CANVAS_WIDTH - 400.0) / 2.0);
    }

    #[test]
    fn test_moving_floor_draws() {
        // type, width, x, moving direction (no cannon roll below floor 5)
        let mut rng = SequenceSource::new(vec![0.0, 0.0, 1.0, 0.9]);
        let floor = build_floor(3, None, &Difficulty::default(), &mut rng);
        assert_eq!(floor.kind, FloorType::Moving);
        assert_eq!(floor.width, MOVING_FLOOR_MIN_WIDTH);
        assert_eq!(floor.x, MOVING_FLOOR_MAX_X - MOVING_FLOOR_MIN_WIDTH);
        let moving = floor.moving.expect("moving state");
        assert_eq!(moving.direction, 1.0);
        assert_eq!(moving.origin_x, floor.x);
    }

    #[test]
    fn test_shrinking_delay_scaled_by_difficulty() {
        let mut rng = SequenceSource::constant(0.15);
        let floor = build_floor(3, None, &Difficulty::default(), &mut rng);
        assert_eq!(floor.kind, FloorType::Shrinking);
        assert_eq!(floor.shrink.expect("shrink").delay, SHRINKING_FLOOR_START_DELAY);

        // Difficulty 2.0: delay multiplier 1 + (2 - 1) * (0.5 - 1) = 0.5
        let difficulty = active_difficulty(105);
        let mut rng = SequenceSource::constant(0.15);
        let floor = build_floor(3, None, &difficulty, &mut rng);
        assert_eq!(floor.shrink.expect("shrink").delay, 90.0);
    }

    #[test]
    fn test_cannon_side_points_away_from_center() {
        // Normal floor on the left half: type, width, x, cannon roll
        let prev = plain_floor(5, 20.0, 70.0);
        let mut rng = SequenceSource::new(vec![0.9, 0.0, 0.0, 0.0]);
        let floor = build_floor(6, Some(&prev), &Difficulty::default(), &mut rng);
        assert_eq!(floor.cannon, Some(Side::Right));

        let prev = plain_floor(5, 340.0, 70.0);
        let mut rng = SequenceSource::new(vec![0.9, 0.0, 0.999, 0.0]);
        let floor = build_floor(6, Some(&prev), &Difficulty::default(), &mut rng);
        assert_eq!(floor.cannon, Some(Side::Left));
    }

    #[test]
    fn test_no_cannon_below_min_floor() {
        let mut rng = SequenceSource::constant(0.0);
        let floor = build_floor(4, None, &Difficulty::default(), &mut rng);
        assert_eq!(floor.cannon, None);
    }

    #[test]
    fn test_seed_coins() {
        let floor = plain_floor(10, 100.0, 200.0);

        // Failed chance roll
        let mut rng = SequenceSource::constant(0.9);
        assert!(seed_coins(&floor, &mut rng).is_empty());

        // chance, base count roll (0.99 -> 3), three x draws
        let mut rng = SequenceSource::new(vec![0.0, 0.99, 0.0, 0.5, 1.0]);
        let coins = seed_coins(&floor, &mut rng);
        assert_eq!(coins.len(), 3);
        assert_eq!(coins[0].x, 118.0);
        assert_eq!(coins[1].x, 200.0);
        assert_eq!(coins[2].x, 282.0);
        assert!(coins.iter().all(|c| c.y == floor.y + COIN_Y_OFFSET));
    }

    #[test]
    fn test_no_coins_on_start_floor() {
        let floor = plain_floor(0, 10.0, 410.0);
        let mut rng = SequenceSource::constant(0.0);
        assert!(seed_coins(&floor, &mut rng).is_empty());
    }

    #[test]
    fn test_spawn_floor_registers_coins() {
        // Every roll at zero: each floor past the start gets exactly one coin
        let world = world_with(vec![0.0]);
        assert_eq!(world.coins.len(), 10);
        for floor in world.floors.iter().skip(1) {
            assert_eq!(floor.coin_ids.len(), 1);
            let coin = world
                .coins
                .iter()
                .find(|c| c.id == floor.coin_ids[0])
                .expect("registered coin");
            assert_eq!(coin.floor_number, floor.number);
        }
        assert!(world.floors[0].coin_ids.is_empty());
    }

    #[test]
    fn test_stream_generates_ahead() {
        let mut world = world_with(vec![0.5]);
        assert_eq!(world.floors.last().map(|f| f.number), Some(10));

        world.ball.pos.y = floor_y(4) - 20.0;
        stream_floors(&mut world);
        assert_eq!(world.floors.last().map(|f| f.number), Some(14));
        assert!(world.floors.windows(2).all(|w| w[1].number == w[0].number + 1));
    }

    #[test]
    fn test_stream_keeps_floors_behind() {
        let mut world = world_with(vec![0.5]);
        world.ball.pos.y = floor_y(30);
        stream_floors(&mut world);
        assert_eq!(world.floors.first().map(|f| f.number), Some(0));
        assert_eq!(world.floors.last().map(|f| f.number), Some(40));
    }

    proptest! {
        #[test]
        fn floor_y_round_trips(number in 0u32..100_000) {
            let y = floor_y(number);
            prop_assert_eq!(floor_index_at(y), number as i64);
            prop_assert_eq!(floor_y(number + 1), y - FLOOR_VERTICAL_SPACING);
        }

        #[test]
        fn generated_floors_stay_in_corridor(seed in any::<u64>()) {
            let mut world = crate::sim::World::new(
                seed,
                crate::sim::BallKind::Standard,
                crate::sim::BallKind::Standard.base_config(),
                Default::default(),
                0,
            );
            world.ball.pos.y = floor_y(200);
            stream_floors(&mut world);
            for floor in &world.floors {
                prop_assert!(floor.x >= 10.0 - 0.001);
                prop_assert!(floor.right() <= 420.0 + 0.001);
            }
            for coin in &world.coins {
                let floor = world.floor(coin.floor_number).expect("owning floor");
                prop_assert!(floor.coin_ids.contains(&coin.id));
            }
        }
    }
}
