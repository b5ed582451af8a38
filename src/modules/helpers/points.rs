/// points awarded for finishing 1st through 10th
pub const POINTS_TABLE: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

pub struct PointsTable {}

impl PointsTable {
    /// # points for a finishing position
    /// positions outside 1..=10 score nothing. 0 and negative positions are used
    /// as "no position entered".
    ///
    /// ## Arguments
    /// * `position` - the finishing position, 1 being the winner
    ///
    /// ## Returns
    /// * `u32` - the points awarded
    pub fn points_for_position(position: i32) -> u32 {
        if !(1..=POINTS_TABLE.len() as i32).contains(&position) {
            return 0;
        }

        POINTS_TABLE[(position - 1) as usize]
    }

    pub fn is_win(position: i32) -> bool {
        position == 1
    }

    pub fn is_podium(position: i32) -> bool {
        (1..=3).contains(&position)
    }
}
