mod concurrency;
mod rehash_upgrade;
