pub const SCHEMA: &str = "
-- Prompt records
CREATE TABLE IF NOT EXISTS prompts (
    id TEXT PRIMARY KEY,          -- UUID v4 string
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    full_prompt TEXT NOT NULL,
    category TEXT NOT NULL,       -- Category label, e.g. \"Image Generation\"
    owner_id TEXT NOT NULL,       -- Session uid of the creator, never updated
    owner_name TEXT NOT NULL,
    likes INTEGER NOT NULL DEFAULT 0, -- Always COUNT(*) of prompt_likes rows
    created_at INTEGER NOT NULL,  -- Unix timestamp (nanoseconds)
    updated_at INTEGER NOT NULL   -- Unix timestamp (nanoseconds)
);

-- Liked-by set, one row per (prompt, user)
CREATE TABLE IF NOT EXISTS prompt_likes (
    prompt_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    PRIMARY KEY (prompt_id, user_id)
);

-- User profiles
CREATE TABLE IF NOT EXISTS profiles (
    uid TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    name TEXT NOT NULL,
    avatar_url TEXT,
    provider TEXT NOT NULL,       -- email | google | github
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    last_login_at INTEGER
);

-- Indexes for the dashboard query
CREATE INDEX IF NOT EXISTS idx_prompts_owner_created ON prompts(owner_id, created_at DESC);
";
