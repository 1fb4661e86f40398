//! The documented 29-question survey and its reference "Slim/Vata-leaning" answers.

/// Reference profile used by the demo, in survey order.
pub const SAMPLE_PROFILE: [(&str, &str); 29] = [
    ("Body Size", "Slim"),
    ("Body Weight", "Moderate - no difficulties in gaining or losing weight"),
    ("Height", "Average"),
    ("Bone Structure", "Light, Small bones, prominent joints"),
    ("Complexion", "Fair-skin sunburns easily"),
    ("General feel of skin", "Dry and thin, cool to touch, rough"),
    ("Texture of Skin", "Dry, pigments and aging"),
    ("Hair Color", "Black/Brown,dull"),
    ("Appearance of Hair", "Dry, black, knotted, brittle"),
    ("Shape of face", "Long, angular, thin"),
    ("Eyes", "Small, active, darting, dark eyes"),
    ("Eyelashes", "Scanty eyelashes"),
    ("Blinking of Eyes", "Rapid Blinking"),
    ("Cheeks", "Wrinkled, Sunken"),
    ("Nose", "Crooked, Narrow"),
    ("Teeth and gums", "Protruding, Irregular teeth, Receding gums"),
    ("Lips", "Tight, thin, dry lips which chaps easily"),
    ("Nails", "Dry, Rough, Brittle, Break"),
    ("Appetite", "Irregular and scanty"),
    ("Liking tastes", "Sweet / Sour / Salty"),
    ("Metabolism Type", "fast"),
    ("Climate Preference", "warm"),
    ("Stress Levels", "high"),
    ("Sleep Patterns", "short"),
    ("Dietary Habits", "vegan"),
    ("Physical Activity Level", "active"),
    ("Water Intake", "low"),
    ("Digestion Quality", "weak"),
    ("Skin Sensitivity", "sensitive"),
];

/// The three dosha classes.
pub const DOSHA_CLASSES: [&str; 3] = ["Vata", "Pitta", "Kapha"];

/// Answer options for every survey question, in the same order as
/// [`SAMPLE_PROFILE`]; the options lean Vata, Pitta, Kapha respectively.
pub const SURVEY_OPTIONS: [(&str, [&str; 3]); 29] = [
    ("Body Size", ["Slim", "Medium", "Large"]),
    ("Body Weight", ["Low - difficulties in gaining weight", "Moderate - no difficulties in gaining or losing weight", "Heavy - difficulties in losing weight"]),
    ("Height", ["Short", "Average", "Tall"]),
    ("Bone Structure", ["Light, Small bones, prominent joints", "Medium bone structure", "Large, broad shoulders , heavy bone structure"]),
    ("Complexion", ["Fair-skin sunburns easily", "White, pale, tans easily", "Dark-Complexion, tans easily"]),
    ("General feel of skin", ["Dry and thin, cool to touch, rough", "Smooth and warm, oily T-zone", "Thick and moist/greasy, cold"]),
    ("Texture of Skin", ["Dry, pigments and aging", "Freckles, many moles, redness and rashes", "Oily"]),
    ("Hair Color", ["Black/Brown,dull", "Red, light brown, yellow", "Brown"]),
    ("Appearance of Hair", ["Dry, black, knotted, brittle", "Straight, oily", "Thick, curly"]),
    ("Shape of face", ["Long, angular, thin", "Heart-shaped, pointed chin", "Large, round, full"]),
    ("Eyes", ["Small, active, darting, dark eyes", "Medium-sized, penetrating, light-sensitive eyes", "Big, round, beautiful, glowing eyes"]),
    ("Eyelashes", ["Scanty eyelashes", "Moderate eyelashes", "Thick/Fused eyelashes"]),
    ("Blinking of Eyes", ["Rapid Blinking", "Moderate Blinking", "More or less stable"]),
    ("Cheeks", ["Wrinkled, Sunken", "Smooth, Flat", "Rounded, Plump"]),
    ("Nose", ["Crooked, Narrow", "Pointed, Average", "Rounded, Large open nostrils"]),
    ("Teeth and gums", ["Protruding, Irregular teeth, Receding gums", "Medium-sized teeth, Reddish gums", "Big, White, Strong teeth, Healthy gums"]),
    ("Lips", ["Tight, thin, dry lips which chaps easily", "Lips are soft, medium-sized", "Lips are large, soft, pink, and full"]),
    ("Nails", ["Dry, Rough, Brittle, Break", "Sharp, Flexible, Pink, Lustrous", "Thick, Oily, Smooth, Polished"]),
    ("Appetite", ["Irregular and scanty", "Strong, Unbearable", "Slow but steady"]),
    ("Liking tastes", ["Sweet / Sour / Salty", "Sweet / Bitter / Astringent", "Pungent / Bitter / Astringent"]),
    ("Metabolism Type", ["fast", "moderate", "slow"]),
    ("Climate Preference", ["warm", "cool", "moderate"]),
    ("Stress Levels", ["high", "moderate", "low"]),
    ("Sleep Patterns", ["short", "moderate", "long"]),
    ("Dietary Habits", ["vegan", "vegetarian", "omnivorous"]),
    ("Physical Activity Level", ["high", "moderate", "sedentary"]),
    ("Water Intake", ["low", "moderate", "high"]),
    ("Digestion Quality", ["weak", "strong", "moderate"]),
    ("Skin Sensitivity", ["sensitive", "normal", "insensitive"]),
];
