use super::{
    AnimationStyle, MessageColors, Theme, ThemeAnimations, ThemeAvatars, ThemeColors, ThemeFonts,
    ThemeMetadata, ThemePatterns, ThinkingStyle,
};

pub static MAHABHARATA: Theme = Theme {
    id: "mahabharata",
    name: "Mahabharata",
    description: "Ancient Indian epic of dharma and cosmic battles",
    colors: ThemeColors {
        primary: "#FF6B35",    // saffron
        secondary: "#F7931E",
        accent: "#D4AF37",     // gold
        background: "#FFF8E7",
        text: "#2C1810",
        border: "#E8C4A0",
        message_bg: MessageColors {
            user: "#FFE4CC",
            assistant: "#FFFFFF",
        },
        input_bg: "#FFFFFF",
        header_bg: "#FF6B35",
    },
    fonts: ThemeFonts {
        heading: "\"Cinzel\", serif",
        body: "\"Lora\", serif",
        code: Some("\"Fira Code\", monospace"),
    },
    avatars: ThemeAvatars {
        assistant: "/avatars/mahabharata/krishna.png",
        user: "/avatars/mahabharata/arjuna.png",
    },
    patterns: ThemePatterns {
        background: Some("/patterns/mahabharata/lotus-mandala.svg"),
        decoration: Some("/patterns/mahabharata/om-border.svg"),
        opacity: Some(0.05),
    },
    animations: ThemeAnimations {
        message_entry: AnimationStyle::FadeSlideUp,
        thinking: ThinkingStyle::LotusBloom,
    },
    metadata: ThemeMetadata {
        culture: "Hindu",
        primary_language: "Sanskrit",
        region: "Indian Subcontinent",
    },
};

pub static BIBLE: Theme = Theme {
    id: "bible",
    name: "Holy Bible",
    description: "Sacred Christian scriptures of faith and redemption",
    colors: ThemeColors {
        primary: "#4A90E2",
        secondary: "#8B4513",
        accent: "#FFD700",
        background: "#F5F5DC",
        text: "#2F4F4F",
        border: "#DAA520",
        message_bg: MessageColors {
            user: "#E6F2FF",
            assistant: "#FFFFFF",
        },
        input_bg: "#FFFFFF",
        header_bg: "#4A90E2",
    },
    fonts: ThemeFonts {
        heading: "\"Crimson Text\", serif",
        body: "\"EB Garamond\", serif",
        code: Some("\"Courier Prime\", monospace"),
    },
    avatars: ThemeAvatars {
        assistant: "/avatars/bible/angel.png",
        user: "/avatars/bible/pilgrim.png",
    },
    patterns: ThemePatterns {
        background: Some("/patterns/bible/cross-subtle.svg"),
        decoration: Some("/patterns/bible/vine-border.svg"),
        opacity: Some(0.04),
    },
    animations: ThemeAnimations {
        message_entry: AnimationStyle::GracefulFade,
        thinking: ThinkingStyle::CandleFlicker,
    },
    metadata: ThemeMetadata {
        culture: "Christian",
        primary_language: "Hebrew/Greek",
        region: "Mediterranean",
    },
};

pub static QURAN: Theme = Theme {
    id: "quran",
    name: "Al-Quran",
    description: "Divine revelations of guidance and mercy",
    colors: ThemeColors {
        primary: "#006B3F",
        secondary: "#FFD700",
        accent: "#00A86B",
        background: "#F0F8F0",
        text: "#1B4332",
        border: "#B8860B",
        message_bg: MessageColors {
            user: "#E8F5E9",
            assistant: "#FFFFFF",
        },
        input_bg: "#FFFFFF",
        header_bg: "#006B3F",
    },
    fonts: ThemeFonts {
        heading: "\"Amiri\", serif",
        body: "\"Noto Naskh Arabic\", serif",
        code: Some("\"Fira Code\", monospace"),
    },
    avatars: ThemeAvatars {
        assistant: "/avatars/quran/scholar.png",
        user: "/avatars/quran/believer.png",
    },
    patterns: ThemePatterns {
        background: Some("/patterns/quran/geometric-islamic.svg"),
        decoration: Some("/patterns/quran/arabesque.svg"),
        opacity: Some(0.06),
    },
    animations: ThemeAnimations {
        message_entry: AnimationStyle::ReverentSlide,
        thinking: ThinkingStyle::PrayerBeads,
    },
    metadata: ThemeMetadata {
        culture: "Islamic",
        primary_language: "Arabic",
        region: "Arabian Peninsula",
    },
};

pub static DEFAULT: Theme = Theme {
    id: "default",
    name: "Knowledge Assistant",
    description: "General knowledge assistant",
    colors: ThemeColors {
        primary: "#3B82F6",
        secondary: "#6366F1",
        accent: "#8B5CF6",
        background: "#FFFFFF",
        text: "#1F2937",
        border: "#E5E7EB",
        message_bg: MessageColors {
            user: "#EFF6FF",
            assistant: "#F9FAFB",
        },
        input_bg: "#F9FAFB",
        header_bg: "#3B82F6",
    },
    fonts: ThemeFonts {
        heading: "\"Inter\", sans-serif",
        body: "\"Inter\", sans-serif",
        code: Some("\"Fira Code\", monospace"),
    },
    avatars: ThemeAvatars {
        assistant: "/avatars/default/assistant.png",
        user: "/avatars/default/user.png",
    },
    patterns: ThemePatterns {
        background: None,
        decoration: None,
        opacity: None,
    },
    animations: ThemeAnimations {
        message_entry: AnimationStyle::FadeSlideUp,
        thinking: ThinkingStyle::Pulse,
    },
    metadata: ThemeMetadata {
        culture: "Universal",
        primary_language: "English",
        region: "Global",
    },
};
