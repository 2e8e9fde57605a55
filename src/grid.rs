//! Layout of the weekly timetable: Monday to Friday, half-hour rows from
//! 08:00 to 20:00, 60px per row.

use tracing::warn;

use crate::models::{CourseColor, DayOfWeek, Schedule, SessionType, TimeSlot};

pub const WEEKDAYS: [DayOfWeek; 5] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
];

const GRID_START_MINUTES: u32 = 8 * 60;
const ROW_MINUTES: f64 = 30.0;
const ROW_HEIGHT_PX: f64 = 60.0;
const ROW_COUNT: u32 = 25;

/// "08:00", "08:30", ... "20:00".
pub fn time_labels() -> Vec<String> {
    (0..ROW_COUNT)
        .map(|i| {
            let minutes = GRID_START_MINUTES + i * 30;
            format!("{:02}:{:02}", minutes / 60, minutes % 60)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPosition {
    pub top: f64,
    pub height: f64,
}

/// Pixel offset and height of a slot. Slots starting before 08:00 get a
/// negative `top`. `None` when either time is malformed or the slot ends
/// before it starts.
pub fn slot_position(slot: &TimeSlot) -> Option<SlotPosition> {
    let start = slot.start_minutes()?;
    let duration = slot.duration_minutes()?;

    let top = (f64::from(start) - f64::from(GRID_START_MINUTES)) / ROW_MINUTES * ROW_HEIGHT_PX;
    let height = f64::from(duration) / ROW_MINUTES * ROW_HEIGHT_PX;
    Some(SlotPosition { top, height })
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridBlock {
    pub course_code: String,
    pub course_title: String,
    pub color: CourseColor,
    pub location: String,
    pub kind: SessionType,
    pub start_time: String,
    pub end_time: String,
    pub is_personal: bool,
    pub position: SlotPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub day: DayOfWeek,
    pub blocks: Vec<GridBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyGrid {
    pub labels: Vec<String>,
    pub columns: Vec<DayColumn>,
}

impl WeeklyGrid {
    /// Weekend slots and slots with unusable times are left out.
    pub fn build(schedule: &Schedule) -> Self {
        let mut columns: Vec<DayColumn> = WEEKDAYS
            .iter()
            .map(|&day| DayColumn {
                day,
                blocks: Vec::new(),
            })
            .collect();

        for entry in &schedule.entries {
            for slot in &entry.time_slots {
                let Some(column) = columns.iter_mut().find(|c| c.day == slot.day) else {
                    continue;
                };
                let Some(position) = slot_position(slot) else {
                    warn!(
                        "Skipping {} slot with unusable times {}-{}",
                        entry.course_code, slot.start_time, slot.end_time
                    );
                    continue;
                };

                column.blocks.push(GridBlock {
                    course_code: entry.course_code.clone(),
                    course_title: entry.course_title.clone(),
                    color: entry.color,
                    location: slot.location.clone(),
                    kind: slot.kind,
                    start_time: slot.start_time.clone(),
                    end_time: slot.end_time.clone(),
                    is_personal: entry.is_personal,
                    position,
                });
            }
        }

        for column in &mut columns {
            column
                .blocks
                .sort_by(|a, b| a.position.top.total_cmp(&b.position.top));
        }

        Self {
            labels: time_labels(),
            columns,
        }
    }

    pub fn column(&self, day: DayOfWeek) -> Option<&DayColumn> {
        self.columns.iter().find(|c| c.day == day)
    }

    pub fn block_count(&self) -> usize {
        self.columns.iter().map(|c| c.blocks.len()).sum()
    }
}
