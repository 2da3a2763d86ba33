pub fn get_signature(version: &str) -> String {
    format!(
        r#"
    __      __                             __
   /  \    /  \______  _  ____ _____    ____ |  | __
   \   \/\/   /  _ \ \/ \/ /  \\__  \ _/ ___\|  |/ /    Wowpack (addon installer for World of Warcraft)
    \        (  <_> )     /|  |_> > __ \\  \___|    <
     \__/\  / \____/ \/\_/ |   __(____  /\___  >__|_ \   v{}
          \/               |__|       \/     \/     \/
"#,
        version
    )
}
