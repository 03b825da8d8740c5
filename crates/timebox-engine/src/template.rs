//! Starter sections for a day that has no earlier plan to carry over.

use crate::plan::{new_id, Section, Task, TaskKind};

/// Colours handed to timeboxed sections, in order.
pub const COLOR_PALETTE: [&str; 6] = ["sky", "teal", "rose", "orange", "violet", "emerald"];

/// Label of the weekday focus prompt; its answer is cleared every day.
pub const WIN_PROMPT: &str = "ONE thing that makes today a win";
/// Label of the weekend intention prompt; its answer is cleared every day.
pub const INTENTION_PROMPT: &str = "e.g., Relax, Socialize, Learn";

fn section(title: &str, icon: &str, goal: Option<&str>, color: Option<usize>) -> Section {
    Section {
        icon: icon.to_string(),
        goal: goal.map(str::to_string),
        color: color.map(|i| COLOR_PALETTE[i % COLOR_PALETTE.len()].to_string()),
        ..Section::new(new_id(), title)
    }
}

fn untimed(title: &str, icon: &str, task: Task) -> Section {
    Section {
        is_timeboxed: Some(false),
        tasks: vec![task],
        ..section(title, icon, None, None)
    }
}

fn checkbox(label: &str) -> Task {
    Task::new(label, TaskKind::Checkbox { checked: false })
}

fn short_text(label: &str) -> Task {
    Task::new(label, TaskKind::TextShort { value: String::new() })
}

fn checkbox_with_text(label: &str, value: &str) -> Task {
    Task::new(
        label,
        TaskKind::CheckboxWithText {
            checked: false,
            value: value.to_string(),
        },
    )
}

/// Monday to Friday: a focus prompt and five timed blocks from 07:00.
pub fn weekday_template() -> Vec<Section> {
    let focus = Task::new(
        format!("The {}:", WIN_PROMPT),
        TaskKind::TextLong {
            value: String::new(),
        },
    );

    let mut shutdown = section(
        "Evening Shutdown",
        "🌙",
        Some("Transition out of work and reset for tomorrow."),
        Some(3),
    );
    // Open-ended: no end time, so it starts in the tray.
    shutdown.start_time = Some("17:30".to_string());
    shutdown.tasks = vec![
        checkbox("10-Minute Tidy: Set a timer and declutter one small area."),
        checkbox("Dinner."),
        short_text("Free Time / Hobby (Read, watch a show, talk with family, etc.)"),
        checkbox("Prepare for tomorrow: Lay out clothes, pack bag."),
        checkbox("Fill out tomorrow's planner."),
    ];

    vec![
        untimed("Today’s Focus", "🎯", focus),
        Section {
            tasks: vec![
                checkbox("Drink a full glass of water."),
                checkbox("System #3 (Exercise): Put on workout clothes."),
                short_text("Movement (15-min walk, stretching, gym, etc.)"),
                checkbox("Get ready for the day (Shower, get dressed)."),
                checkbox("Breakfast & Coffee/Tea."),
            ],
            ..section(
                "Morning Launch",
                "🌅",
                Some("Wake up your body and brain."),
                Some(0),
            )
            .with_times("07:00", "09:30")
        },
        Section {
            tasks: vec![
                checkbox("System #2 (9-5 Job): Write your Top 3 Job Tasks on a sticky note."),
                checkbox(
                    "System #1 (Data Science): Start a 25-min timer and work on your course. Do this first.",
                ),
                checkbox("Deep Work: Start Job Task #1 from your sticky note."),
                checkbox("Take a 5-minute break away from the screen."),
            ],
            ..section(
                "Work Block 1",
                "💻",
                Some("Protect your focus for important tasks."),
                Some(1),
            )
            .with_times("09:30", "13:00")
        },
        Section {
            tasks: vec![
                checkbox("Eat lunch (away from your desk)."),
                checkbox(
                    "Do something non-work related (listen to music, walk, watch a short video).",
                ),
            ],
            ..section(
                "Recharge Block",
                "🥗",
                Some("Refuel and give your brain a real break."),
                Some(2),
            )
            .with_times("13:00", "14:00")
        },
        Section {
            tasks: vec![
                checkbox("Focused Work: Tackle Job Tasks #2 & #3."),
                checkbox("Check and respond to emails/messages."),
                checkbox(
                    "Evening Shutdown Prep: Note tomorrow's most important task. Close unnecessary tabs.",
                ),
            ],
            ..section(
                "Work Block 2",
                "💻",
                Some("Finish strong and handle collaborative work."),
                Some(1),
            )
            .with_times("14:00", "17:30")
        },
        shutdown,
    ]
}

/// Saturday and Sunday: an intention prompt and three untimed blocks.
pub fn weekend_template() -> Vec<Section> {
    vec![
        untimed("Weekend Intention", "✨", short_text(INTENTION_PROMPT)),
        Section {
            tasks: vec![
                checkbox("Wake up without an alarm (if possible!)."),
                checkbox("System #3 (Exercise): Enjoy a longer form of movement."),
                checkbox("System #1 (Data Science): Focused study block (e.g., 60-90 minutes)."),
                checkbox("Breakfast/Brunch."),
            ],
            ..section(
                "Morning",
                "☀️",
                Some("Start the day with intention, without pressure."),
                Some(0),
            )
        },
        Section {
            tasks: vec![
                checkbox_with_text("Life Admin:", "Groceries, laundry, meal prep"),
                checkbox_with_text("Social Time:", "Meet friends, call family"),
                checkbox_with_text("Hobby/Project:", "Work on something you love"),
            ],
            ..section(
                "Afternoon",
                "🌱",
                Some("Mix productivity with pleasure. Choose one major block."),
                Some(1),
            )
        },
        Section {
            tasks: vec![
                checkbox("Dinner."),
                checkbox("Relaxing activity (movie, reading, etc.)."),
                checkbox("Sunday Reset: Look at the week's calendar."),
                checkbox("Sunday Reset: Write Monday's Top 3 tasks."),
                checkbox("Sunday Reset: Tidy up your workspace for a fresh start."),
            ],
            ..section(
                "Evening",
                "🌙",
                Some("Wind down and prepare for the week ahead."),
                Some(2),
            )
        },
    ]
}
