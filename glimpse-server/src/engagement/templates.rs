use rand::seq::SliceRandom;
use rand::Rng;

/// Comment templates for photo posts
pub const POST_COMMENTS: [&str; 20] = [
    "Amazing shot! 🔥",
    "Love this! ❤️",
    "So beautiful! ✨",
    "Incredible! 😍",
    "This is perfect! 👌",
    "Stunning! 📸",
    "Goals! 💯",
    "Obsessed with this! 😱",
    "Pure magic! ✨",
    "Can't stop staring! 👀",
    "This hits different! 🔥",
    "Absolutely gorgeous! 💕",
    "Living for this! 🙌",
    "So aesthetic! 🎨",
    "This is everything! ⭐",
    "Wow factor! 🤩",
    "Perfection! 💎",
    "Chef's kiss! 👨‍🍳💋",
    "This is art! 🖼️",
    "Breathtaking! 🌟",
];

/// Comment templates for reels
pub const REEL_COMMENTS: [&str; 20] = [
    "This is fire! 🔥🔥🔥",
    "Can't stop watching! 🔄",
    "Viral vibes! 📈",
    "This hits different! 💯",
    "Obsessed! 😍",
    "Pure talent! ⭐",
    "So good! 🙌",
    "This is everything! ✨",
    "Amazing content! 👏",
    "Love this energy! ⚡",
    "Incredible! 🤩",
    "This is art! 🎨",
    "So creative! 💡",
    "Perfection! 💎",
    "Mind blown! 🤯",
    "This deserves to go viral! 🚀",
    "Can't get enough! 🔁",
    "So talented! 🌟",
    "This made my day! ☀️",
    "Absolutely stunning! 💫",
];

/// Draw one template uniformly, with replacement
pub fn pick<R: Rng>(templates: &'static [&'static str], rng: &mut R) -> &'static str {
    templates.choose(rng).copied().unwrap_or("")
}
