//! Built-in sample input, four entries as they appear when the Takeout
//! HTML page is copied as text (including the mis-decoded spaces).

pub const SAMPLE_DATA: &str = concat!(
    "**YouTube**\n",
    "Watched\u{c2}\u{a0}**Disco Button Funk up any room with MQTT, CircuitPython, and a Raspberry Pi Pico W** **Prof. John Gallaugher** Jan 29, 2025, 8:00:26\u{e2}\u{20ac}\u{af}AM EST\n",
    "**Products:**  YouTube **Why is this here?**  This activity was saved to your Google Account because the following settings were on: YouTube watch history. You can control these settings  **here**.\n",
    "**YouTube**\n",
    "Watched\u{c2}\u{a0}**Physical Computing - Apple Distinguished Educator Showcase Dallas 2023 - Prof. John Gallaugher** **Prof. John Gallaugher** Oct 16, 2024, 9:05:40\u{e2}\u{20ac}\u{af}AM EST\n",
    "**Products:**  YouTube **Why is this here?**  This activity was saved to your Google Account because the following settings were on: YouTube watch history. You can control these settings  **here**.\n",
    "**YouTube**\n",
    "Watched\u{c2}\u{a0}**Physical Computing - Apple Distinguished Educator Showcase Dallas 2023 - Prof. John Gallaugher** **Prof. John Gallaugher** Jan 30, 2024, 5:45:47\u{e2}\u{20ac}\u{af}AM EST\n",
    "**Products:**  YouTube **Why is this here?**  This activity was saved to your Google Account because the following settings were on: YouTube watch history. You can control these settings  **here**.\n",
    "**YouTube**\n",
    "Watched\u{c2}\u{a0}**Fast Fashion Is Hot Garbage | Climate Town** **Climate Town** Sep 1, 2023, 2:45:20\u{e2}\u{20ac}\u{af}PM EST\n",
    "**Products:**  YouTube **Why is this here?**  This activity was saved to your Google Account because the following settings were on: YouTube watch history. You can control these settings  **here**.",
);
