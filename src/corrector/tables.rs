// WHY: Literal word lists consumed by the rule table and the split/merge guards
// Kept as plain data so new abbreviations are one-line additions, never new branches

/// Latin and cross-reference abbreviations that never terminate a sentence
pub const REFERENCE_ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "cf.", "viz.", "vs.", "v.", "approx.", "ca.", "resp.",
    "esp.", "incl.", "excl.", "ibid.", "sc.", "s.v.", "q.v.", "w.r.t.",
];

/// Abbreviations that end sentences often enough that only narrow continuations merge
pub const SOMETIMES_ENDS_ABBREVIATIONS: &[&str] = &[
    "etc.", "a.m.", "p.m.", "A.M.", "P.M.", "al.", "cit.", "seq.", "ff.",
    "B.C.", "A.D.", "B.C.E.", "C.E.", "Ph.D.", "M.D.", "D.C.", "Jan.", "Feb.",
    "Aug.", "Sept.", "Oct.", "Nov.", "Dec.",
];

/// Time-of-day markers; a subset of the sometimes-ends class
pub const TIME_ABBREVIATIONS: &[&str] = &["a.m.", "p.m.", "A.M.", "P.M."];

/// Reference-number and measurement markers that collide with ordinary words
pub const AMBIGUOUS_ABBREVIATIONS: &[&str] = &[
    "no.", "No.", "nos.", "Nos.", "vol.", "Vol.", "vols.", "Vols.", "p.", "pp.",
    "fig.", "Fig.", "figs.", "Figs.", "ch.", "Ch.", "chap.", "Chap.", "sec.",
    "Sec.", "art.", "Art.", "para.", "Para.", "eq.", "Eq.", "ed.", "eds.",
    "op.", "Op.", "pt.", "Pt.", "ser.", "ft.", "lb.", "lbs.", "oz.",
    "km.", "mi.", "min.", "hr.", "hrs.", "mm.", "cm.", "kg.",
];

/// Company-name endings
pub const ENTITY_SUFFIX_ABBREVIATIONS: &[&str] = &[
    "Inc.", "Corp.", "Ltd.", "Co.", "Cos.", "LLC.", "L.L.C.", "Bros.", "plc.",
    "PLC.", "Pty.", "S.A.", "N.V.", "Assn.", "Mfg.",
];

/// Honorifics and ranks that normally prefix a name
pub const PERSONAL_TITLE_ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.", "Rev.", "Gen.",
    "Col.", "Capt.", "Lt.", "Sgt.", "Hon.", "Gov.", "Sen.", "Rep.", "Pres.",
    "Fr.", "Mme.", "Mlle.", "Messrs.", "Maj.", "Adm.", "Cmdr.", "Supt.",
];

/// Titles that the title+name repair pass fuses with a one-word exclaimed name
pub const NAME_REPAIR_TITLES: &[&str] = &["Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Capt.", "Rev."];

/// Dotted country and organisation codes
pub const COUNTRY_CODE_ABBREVIATIONS: &[&str] = &[
    "U.S.", "U.S.A.", "U.K.", "U.N.", "E.U.", "U.A.E.", "U.S.S.R.", "N.Z.",
    "P.R.C.", "R.O.C.",
];

/// Capitalized words that continue a country code as an institution name ("U.S. Army")
pub const INSTITUTION_WORDS: &[&str] = &[
    "Army", "Navy", "Air", "Marine", "Marines", "Coast", "Congress", "Senate",
    "House", "Department", "Dept.", "Government", "Embassy", "Court", "Supreme",
    "Treasury", "Federal", "Postal", "Census", "Bureau", "Constitution", "Open",
    "Securities", "Secretary", "Attorney", "Ambassador", "Forces", "Military",
    "Parliament", "Office", "Mint", "Geological", "Patent", "Customs", "Border",
    "National", "Security", "Council", "Cabinet", "Commission", "Agency",
    "Administration", "Ministry", "Foreign", "Home", "Royal", "Crown", "Bank",
    "Dollar", "Highway", "Route", "Olympic", "Space", "Forest", "Immigration",
    "Central", "Armed", "Special", "General", "District", "Capitol",
];

/// Two-word Latin abbreviations; the split engine never separates the second word
pub const COMPOUND_ABBREVIATIONS: &[(&str, &str)] = &[
    ("et", "al."),
    ("op.", "cit."),
    ("loc.", "cit."),
    ("et", "seq."),
];

/// Lowercase proof-closing markers split off after a finished clause
pub const PROOF_MARKERS: &[&str] = &["q.e.d.", "q.e.f."];

pub const WEEKDAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Words after "a.m. Monday" that keep the weekday inside the time phrase
pub const TIME_QUALIFIERS: &[&str] = &[
    "and", "or", "but", "nor", "through", "thru", "to", "till", "until",
    "morning", "mornings", "afternoon", "afternoons", "evening", "evenings",
    "night", "nights", "next", "last", "this", "only", "onward", "onwards",
    "instead", "as", "at", "in", "on", "for", "with", "from", "before",
    "after", "during", "the",
];

pub const ARTICLES: &[&str] = &["a", "an", "the"];

pub const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet", "so", "for"];

pub const PREPOSITIONS: &[&str] = &[
    "at", "by", "for", "from", "in", "into", "of", "on", "onto", "per", "to",
    "with", "via", "about", "against", "among", "between", "under", "over",
    "through", "without", "within", "like", "than", "as", "near", "after",
    "before", "during", "since", "until", "upon", "toward", "towards",
];

/// Pronouns, determiners and auxiliaries that cannot be the tail of a company name
pub const FUNCTION_WORDS: &[&str] = &[
    "he", "she", "it", "they", "we", "i", "you", "his", "her", "its", "their",
    "our", "my", "your", "this", "that", "these", "those", "which", "who",
    "whom", "whose", "is", "was", "are", "were", "be", "been", "not", "if",
    "when", "while", "because", "although", "though", "unless",
];

/// Tokens that open a parenthetical or a dash-separated aside
pub const PARENTHETICAL_TOKENS: &[&str] = &["(", "[", "-", "--", "\u{2013}", "\u{2014}"];

/// Prepositions that head a bare "at 5" time phrase
pub const TIME_PHRASE_PREPOSITIONS: &[&str] = &[
    "at", "by", "from", "until", "till", "after", "before", "around", "about",
    "since", "to",
];

/// Proper nouns whose own `!` or `?` must never be read as a sentence end
pub const PUNCTUATED_BRANDS: &[&str] = &[
    "Yahoo!",
    "Jeopardy!",
    "Joomla!",
    "Yum!",
    "Oklahoma!",
    "Mamma Mia!",
    "Airplane!",
    "Wham!",
    "Panic! at the Disco",
    "Who Wants to Be a Millionaire?",
    "Where in the World Is Carmen Sandiego?",
];
