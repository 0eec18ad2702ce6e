//! Read-only lookup tables shared by the text-signal extractor, the gap
//! analyzer and the metric scorers. Built once per process.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Stopwords dropped before keyword matching. Covers function words, generic
/// verbs/adjectives/nouns, and boilerplate from job postings.
pub static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORD_LIST.iter().copied().collect());

/// Technical terms recognised by role alignment and technology-token extraction.
pub static TECH_TERMS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| TECH_TERM_LIST.iter().copied().collect());

/// Capitalized words that are never treated as an organization name.
pub static COMMON_CAPITALIZED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| COMMON_CAPITALIZED_LIST.iter().copied().collect());

/// Multi-word (and a few single-word) technical phrases matched as whole terms.
pub const TECH_PHRASES: &[&str] = &[
    "machine learning",
    "data science",
    "project management",
    "software development",
    "web development",
    "full stack",
    "front end",
    "back end",
    "cloud computing",
    "devops",
    "agile",
    "scrum",
    "ci/cd",
    "rest api",
    "graphql",
    "react",
    "angular",
    "vue",
    "node.js",
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "sql",
    "nosql",
    "mongodb",
    "postgresql",
    "mysql",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "customer service",
    "sales",
    "marketing",
    "business development",
];

/// Framework and tool names picked out of free text regardless of casing rules.
pub const KNOWN_FRAMEWORKS: &[&str] = &[
    "React",
    "Angular",
    "Vue",
    "Django",
    "Flask",
    "Node",
    "Spring",
    "Kubernetes",
    "Docker",
];

/// Verbs that turn a sentence into an achievement claim.
pub const ACHIEVEMENT_VERBS: &[&str] = &[
    "increased",
    "decreased",
    "improved",
    "reduced",
    "grew",
    "managed",
    "led",
];

/// Technical terms recorded as facts from the original resume.
pub const FACT_TECH_TERMS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "aws",
    "docker",
    "kubernetes",
    "sql",
    "machine learning",
    "ai",
    "api",
    "cloud",
    "agile",
    "scrum",
];

/// Technical terms checked inside a single claim.
pub const CLAIM_TECH_TERMS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "aws",
    "docker",
    "sql",
    "api",
];

/// Role words recorded as facts from the original resume.
pub const FACT_ROLE_TERMS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "lead",
    "director",
    "analyst",
    "architect",
    "designer",
    "scientist",
    "specialist",
    "consultant",
];

/// Role titles whose sudden appearance is a fabrication red flag.
pub const RED_FLAG_ROLE_TITLES: &[&str] = &[
    "Engineer",
    "Developer",
    "Manager",
    "Lead",
    "Director",
    "Architect",
    "Designer",
];

/// Sentence-initial words ignored when counting new capitalized terms.
pub const RED_FLAG_CAPS_EXCLUDED: &[&str] = &[
    "The", "This", "That", "These", "Those", "From", "With", "When", "Where",
];

/// Section header words per standard resume section, in report order.
pub const SECTION_HEADERS: &[(&str, &[&str])] = &[
    ("experience", &["experience", "work history", "employment"]),
    ("education", &["education", "academic", "degree", "degrees"]),
    ("skills", &["skills", "technical skills", "competencies"]),
    ("summary", &["summary", "profile", "objective"]),
];

const COMMON_CAPITALIZED_LIST: &[&str] = &[
    "Led", "Managed", "Developed", "Created", "Built", "Designed", "Implemented", "Launched",
    "Drove", "Improved", "Reduced", "Increased", "The", "A", "An", "In", "On", "At", "For",
    "With", "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December", "Python", "JavaScript", "Java", "React",
    "Node", "AWS", "Docker",
];

const TECH_TERM_LIST: &[&str] = &[
    // languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "swift",
    "kotlin", "php", "scala", "c",
    // frameworks
    "react", "angular", "vue", "django", "flask", "spring", "express", "node.js", "nodejs",
    "next.js", "nextjs", "tensorflow", "pytorch", "jquery", "bootstrap", "tailwind", ".net",
    "asp.net",
    // databases
    "postgresql", "postgres", "mysql", "mongodb", "redis", "elasticsearch", "cassandra", "sql",
    "nosql", "sqlite", "oracle", "dynamodb",
    // cloud and ops
    "aws", "azure", "gcp", "docker", "kubernetes", "k8s", "terraform", "jenkins",
    "github actions", "ci/cd", "ansible", "helm",
    // tools and methods
    "git", "linux", "api", "rest", "graphql", "microservices", "agile", "scrum", "kanban",
    "jira", "confluence", "slack", "trello",
    // data and ml
    "machine learning", "deep learning", "nlp", "data science", "pandas", "numpy",
    "scikit-learn", "spark", "hadoop", "airflow", "tableau",
    // testing
    "pytest", "jest", "mocha", "junit", "selenium", "cypress", "unit test",
    // web
    "html", "css", "sass", "webpack", "babel", "npm", "yarn", "vscode",
];

const STOPWORD_LIST: &[&str] = &[
    // articles, pronouns, prepositions, conjunctions
    "a", "an", "the", "this", "that", "these", "those", "i", "you", "he", "she", "it", "we",
    "they", "them", "their", "theirs", "my", "your", "his", "her", "its", "our", "yours",
    "mine", "ours", "myself", "yourself", "himself", "herself", "itself", "ourselves",
    "themselves", "who", "whom", "whose", "which", "what", "whatever", "whichever", "in", "on",
    "at", "to", "for", "of", "with", "by", "from", "as", "into", "through", "during", "before",
    "after", "above", "below", "between", "among", "under", "over", "about", "against",
    "along", "around", "across", "behind", "beside", "besides", "beyond", "down", "inside",
    "near", "off", "outside", "toward", "towards", "upon", "within", "without", "throughout",
    "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "while",
    "whereas", "if", "unless", "until", "since", "when", "whenever", "where", "wherever",
    "whether", "than",
    // auxiliaries and generic verbs
    "is", "am", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "done", "will", "would", "shall", "should", "may", "might",
    "must", "can", "could", "get", "got", "getting", "give", "given", "giving", "take", "took",
    "taken", "make", "made", "making", "go", "went", "gone", "going", "come", "came", "become",
    "became", "becoming", "seem", "seemed", "seeming", "appears", "appear", "appeared",
    "appearing", "look", "looked", "looking", "looks",
    // adverbs and quantifiers
    "very", "too", "quite", "rather", "somewhat", "somehow", "somewhere", "anywhere",
    "everywhere", "nowhere", "always", "never", "often", "sometimes", "usually", "frequently",
    "rarely", "seldom", "already", "just", "only", "also", "even", "still", "almost",
    "nearly", "hardly", "barely", "really", "actually", "especially", "particularly",
    "generally", "specifically", "all", "any", "some", "many", "much", "few", "little",
    "more", "most", "less", "least", "several", "every", "each", "both", "either", "neither",
    "none", "no", "not", "other", "another", "such", "same", "different",
    // generic adjectives
    "good", "better", "best", "bad", "worse", "worst", "great", "big", "small", "large",
    "long", "short", "high", "low", "new", "old", "young", "early", "late", "right", "wrong",
    "true", "false", "real", "actual", "possible", "impossible", "easy", "hard", "difficult",
    "simple", "complex", "important", "main", "major", "minor", "primary", "secondary",
    "first", "last", "next", "previous", "following", "own", "similar", "certain", "sure",
    "clear", "full", "complete", "total", "whole", "entire", "single", "double", "various",
    "available", "current",
    // vague nouns and verbs
    "able", "ability", "access", "action", "active", "activity", "adapt", "addition",
    "address", "advantage", "age", "agent", "agree", "agreement", "ahead", "allow", "amount",
    "answer", "anyone", "anything", "apply", "applicant", "approach", "area", "article", "ask",
    "aspect", "assume", "attempt", "attention", "average", "avoid", "away", "back", "base",
    "basic", "basis", "begin", "beginning", "believe", "benefit", "body", "book", "bring",
    "build", "business", "call", "candidate", "care", "carry", "case", "cause", "center",
    "central", "century", "certainly", "challenge", "change", "character", "check", "choice",
    "choose", "class", "close", "cold", "collect", "comment", "common", "community",
    "company", "compare", "concern", "condition", "consider", "contain", "continue",
    "control", "cost", "count", "country", "course", "cover", "create", "customer", "date",
    "deal", "decide", "decision", "deep", "degree", "describe", "design", "detail",
    "determine", "develop", "difference", "direct", "discover", "discuss", "discussion",
    "doctor", "door", "drive", "drop", "east", "economic", "economy", "edge", "education",
    "effect", "effort", "eight", "else", "encourage", "end", "energy", "enough", "ensure",
    "enter", "environment", "equal", "establish", "evening", "event", "ever", "everyone",
    "everything", "evidence", "exactly", "example", "exist", "expect", "experience",
    "explain", "face", "fact", "factor", "fall", "family", "fast", "father", "feel",
    "feeling", "field", "figure", "fill", "final", "finally", "find", "fine", "finger",
    "finish", "fire", "firm", "five", "floor", "focus", "follow", "food", "foot", "force",
    "foreign", "forget", "form", "former", "forward", "four", "free", "friend", "front",
    "function", "fund", "future", "gain", "general", "glass", "goal", "ground", "group",
    "grow", "growth", "guess", "guide", "hand", "handle", "hang", "happen", "happy", "head",
    "health", "hear", "heart", "heat", "heavy", "help", "here", "history", "hit", "hold",
    "home", "hope", "hot", "hotel", "hour", "house", "however", "huge", "human", "hundred",
    "idea", "identify", "image", "imagine", "impact", "include", "including", "increase",
    "indeed", "indicate", "individual", "industry", "information", "instead", "interest",
    "international", "interview", "involve", "issue", "item", "join", "keep", "kind", "king",
    "kitchen", "know", "knowledge", "land", "language", "later", "laugh", "law", "lay",
    "lead", "learn", "leave", "left", "legal", "let", "letter", "level", "life", "light",
    "like", "likely", "line", "list", "listen", "live", "local", "lose", "loss", "love",
    "machine", "magazine", "maintain", "majority", "manage", "manager", "manner", "market",
    "marriage", "material", "matter", "maybe", "mean", "meaning", "measure", "media",
    "medical", "meet", "meeting", "member", "memory", "mention", "message", "method",
    "middle", "military", "million", "mind", "minute", "miss", "mission", "model", "modern",
    "moment", "money", "month", "morning", "mother", "mouth", "move", "movement", "movie",
    "music", "name", "nation", "national", "natural", "nature", "necessary", "neck", "need",
    "network", "news", "newspaper", "night", "nine", "nobody", "north", "note", "nothing",
    "notice", "number", "occur", "offer", "office", "officer", "official", "once", "one",
    "onto", "open", "operation", "opportunity", "option", "order", "organization", "others",
    "otherwise", "ought", "overall", "owner", "page", "pain", "painting", "paper", "parent",
    "part", "participant", "particular", "partner", "party", "pass", "past", "patient",
    "pattern", "pay", "peace", "people", "per", "perform", "performance", "perhaps",
    "period", "person", "personal", "phone", "physical", "pick", "picture", "piece", "place",
    "plan", "plant", "play", "player", "point", "police", "policy", "political", "politics",
    "poor", "popular", "population", "position", "positive", "power", "practice", "prepare",
    "present", "president", "pressure", "pretty", "prevent", "price", "private", "probably",
    "problem", "process", "produce", "product", "production", "professional", "professor",
    "program", "project", "property", "protect", "prove", "provide", "public", "pull",
    "purpose", "push", "quality", "question", "quickly", "race", "radio", "raise", "range",
    "rate", "reach", "read", "ready", "reality", "realize", "reason", "receive", "recent",
    "recently", "recognize", "record", "reduce", "reflect", "region", "relate",
    "relationship", "remain", "remember", "remove", "report", "represent", "require",
    "required", "research", "resource", "respond", "response", "responsibility", "rest",
    "result", "return", "reveal", "rich", "rise", "risk", "road", "rock", "role", "room",
    "rule", "safe", "save", "saying", "scene", "school", "science", "scientist", "score",
    "sea", "season", "seat", "second", "section", "security", "seek", "sell", "send",
    "senior", "sense", "series", "serious", "serve", "service", "seven", "shake", "share",
    "sheet", "shoot", "shot", "shoulder", "show", "side", "sign", "significant", "simply",
    "sing", "sister", "site", "situation", "size", "skill", "skin", "smile", "social",
    "society", "soldier", "somebody", "someone", "something", "song", "soon", "sort",
    "sound", "source", "south", "southern", "space", "speak", "special", "specific",
    "speech", "spend", "sport", "staff", "stage", "stand", "standard", "star", "start",
    "state", "statement", "station", "stay", "step", "stock", "stop", "store", "story",
    "strategy", "street", "strong", "structure", "student", "study", "stuff", "style",
    "subject", "success", "successful", "suddenly", "suffer", "suggest", "summer", "support",
    "surface", "system", "table", "talk", "task", "teach", "teacher", "team", "technology",
    "television", "tell", "tend", "term", "test", "text", "thank", "then", "theory", "there",
    "thing", "think", "third", "thought", "thousand", "threat", "three", "throw", "thus",
    "time", "today", "together", "tonight", "tough", "town", "trade", "traditional",
    "training", "travel", "treat", "treatment", "tree", "trial", "trip", "trouble", "truth",
    "turn", "type", "understand", "unit", "usual", "value", "victim", "view", "violence",
    "visit", "voice", "vote", "wait", "walk", "wall", "want", "watch", "water", "way",
    "weapon", "wear", "week", "weight", "well", "west", "western", "white", "wide", "wife",
    "wind", "window", "wish", "woman", "wonder", "word", "work", "worker", "working",
    "world", "worry", "worth", "write", "writer", "yard", "yeah", "year", "yes",
    "yesterday",
    // job posting boilerplate
    "excellent", "preferred", "plus", "application", "hiring", "seeking", "employer",
    "employment", "diverse", "diversity", "inclusion", "location", "remote", "hybrid",
    "fulltime", "parttime", "contract", "permanent", "temporary", "compensation", "salary",
    "benefits", "bonus", "equity", "package", "perks", "culture", "values", "vision",
];
